use serde_json::Value;
use thiserror::Error;

use crate::platform::Platform;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("failed to build http client: {0}")]
    Client(String),

    #[error("request timeout")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("http error {status}")]
    Http { status: reqwest::StatusCode },

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<UpstreamError>,
    },

    #[error("response is not valid json: {0}")]
    Decode(String),

    #[error("upstream rejected request (code {code:?}): {message}")]
    Rejected {
        code: Option<i64>,
        message: String,
        payload: Value,
    },

    #[error("unexpected response shape: {0}")]
    Normalize(String),
}

impl UpstreamError {
    pub fn should_retry(&self) -> bool {
        match self {
            // Transient - retry
            Self::Timeout => true,
            Self::Transport(_) => true,
            Self::Http { .. } => true,

            // The provider answered; asking again will not change its mind
            Self::Decode(_) => false,
            Self::Rejected { .. } => false,
            Self::Normalize(_) => false,
            Self::Client(_) => false,
            Self::Exhausted { .. } => false,
        }
    }

    /// The request URL carries the API key in its query, so it is stripped
    /// before the error is rendered anywhere.
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Http { status }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no known platform for url: {0}")]
    PlatformNotFound(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("upstream returned no video url for {0}")]
    NoVideoUrl(Platform),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
