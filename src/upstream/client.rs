use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;
use std::{fmt, time::Duration};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    config::mask_secret,
    platform::{Platform, extract_share_url, resolve},
    upstream::{
        backoff::backoff_delay,
        errors::{ParseError, UpstreamError},
        normalize::normalize,
        types::NormalizedVideo,
    },
};

pub const DEFAULT_BASE_URL: &str = "https://www.52api.cn/api";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Codes the provider uses to signal success in the response body.
const SUCCESS_CODES: [i64; 2] = [0, 200];

#[derive(Clone)]
pub struct UpstreamConfig {
    pub api_key: String,
    pub base_url: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    pub max_retries: u32,
    /// Retry `n` waits `base_delay * 2^n`.
    pub base_delay: Duration,
}

impl UpstreamConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &mask_secret(&self.api_key))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .finish()
    }
}

/// Anything that can turn a share link into a [`NormalizedVideo`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoParser: Send + Sync {
    async fn parse(
        &self,
        url: &str,
        platform: Option<Platform>,
    ) -> Result<NormalizedVideo, ParseError>;
}

/// Client for the aggregation API. Owns the connection pool; create one at
/// startup and drop it at shutdown.
pub struct UpstreamClient {
    http: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        info!(
            api_key = %mask_secret(&config.api_key),
            base_url = %config.base_url,
            "upstream client initialized"
        );

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// GET `{base_url}/{endpoint}` with the API key and `params`, retrying
    /// transport failures and non-200 statuses with exponential backoff.
    #[instrument(skip(self, params))]
    pub async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut retries = 0;

        loop {
            match self.fetch_once(&url, params).await {
                Ok(body) => return check_body(body),
                Err(err) if err.should_retry() => {
                    if retries >= self.config.max_retries {
                        error!(attempts = retries + 1, error = %err, "upstream request failed");
                        return Err(UpstreamError::Exhausted {
                            attempts: retries + 1,
                            last: Box::new(err),
                        });
                    }
                    retries += 1;
                    let delay = backoff_delay(retries, self.config.base_delay);
                    warn!(
                        error = %err,
                        retry = retries,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "upstream request failed, retrying"
                    );
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn fetch_once(&self, url: &str, params: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .query(&[("key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(UpstreamError::from_reqwest_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpstreamError::Http { status });
        }

        let body = response
            .bytes()
            .await
            .map_err(UpstreamError::from_reqwest_error)?;

        serde_json::from_slice(&body).map_err(|e| {
            let preview: String = String::from_utf8_lossy(&body).chars().take(200).collect();
            error!(error = %e, body = %preview, "upstream response is not json");
            UpstreamError::Decode(e.to_string())
        })
    }

    /// Resolve the platform (unless given), call its endpoint and normalize
    /// the result.
    #[instrument(skip(self), fields(resolved = tracing::field::Empty))]
    pub async fn parse(
        &self,
        url: &str,
        platform: Option<Platform>,
    ) -> Result<NormalizedVideo, ParseError> {
        let share_url = extract_share_url(url);
        let platform = match platform {
            Some(platform) => platform,
            None => resolve(&share_url)
                .ok_or_else(|| ParseError::PlatformNotFound(share_url.clone()))?,
        };
        tracing::Span::current().record("resolved", platform.as_str());

        let endpoint = platform
            .endpoint()
            .ok_or_else(|| ParseError::UnsupportedPlatform(platform.as_str().to_string()))?;

        info!(url = %share_url, name = platform.display_name(), "parsing video");
        let body = self.fetch(endpoint, &[("url", share_url.as_str())]).await?;
        Ok(normalize(platform, &share_url, &body)?)
    }

    /// Just the watermark-free video URL.
    pub async fn no_watermark_url(&self, url: &str) -> Result<String, ParseError> {
        let video = self.parse(url, None).await?;
        if video.video_url.is_empty() {
            return Err(ParseError::NoVideoUrl(video.platform));
        }
        Ok(video.video_url)
    }
}

#[async_trait]
impl VideoParser for UpstreamClient {
    async fn parse(
        &self,
        url: &str,
        platform: Option<Platform>,
    ) -> Result<NormalizedVideo, ParseError> {
        UpstreamClient::parse(self, url, platform).await
    }
}

/// A 200 response can still carry an error; the provider signals it in `code`.
fn check_body(body: Value) -> Result<Value, UpstreamError> {
    let code = body.get("code").and_then(Value::as_i64);
    if code.is_some_and(|c| SUCCESS_CODES.contains(&c)) {
        return Ok(body);
    }

    let message = ["msg", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .unwrap_or("未知错误")
        .to_string();
    error!(?code, %message, "upstream returned an error");

    Err(UpstreamError::Rejected {
        code,
        message,
        payload: body,
    })
}
