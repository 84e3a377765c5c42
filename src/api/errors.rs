use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::warn;

use crate::{
    api::dtos::ApiResponse,
    upstream::{ParseError, UpstreamError},
};

#[derive(Debug)]
pub enum ApiError {
    MissingApiKey,
    InvalidApiKey,
    InvalidBody(String),
    MissingUrl,
    UnknownPlatform(String),
    Parse {
        error: ParseError,
        passthrough: bool,
    },
}

impl ApiError {
    fn parts(self) -> (StatusCode, String, Option<Value>) {
        match self {
            ApiError::MissingApiKey | ApiError::InvalidApiKey => {
                (StatusCode::UNAUTHORIZED, "unauthorized".to_string(), None)
            }
            ApiError::InvalidBody(reason) => (
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {reason}"),
                None,
            ),
            ApiError::MissingUrl => (StatusCode::BAD_REQUEST, "missing url".to_string(), None),
            ApiError::UnknownPlatform(platform) => (
                StatusCode::BAD_REQUEST,
                format!("unsupported platform: {platform}"),
                None,
            ),
            ApiError::Parse { error, passthrough } => parse_error_parts(error, passthrough),
        }
    }
}

fn parse_error_parts(error: ParseError, passthrough: bool) -> (StatusCode, String, Option<Value>) {
    match error {
        ParseError::PlatformNotFound(_) | ParseError::NoVideoUrl(_) => {
            (StatusCode::NOT_FOUND, error.to_string(), None)
        }
        ParseError::UnsupportedPlatform(_) => (StatusCode::BAD_REQUEST, error.to_string(), None),
        ParseError::Upstream(UpstreamError::Rejected {
            message, payload, ..
        }) => (
            StatusCode::BAD_GATEWAY,
            format!("upstream error: {message}"),
            passthrough.then_some(payload),
        ),
        ParseError::Upstream(UpstreamError::Client(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string(), None)
        }
        ParseError::Upstream(_) => (StatusCode::BAD_GATEWAY, error.to_string(), None),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, data) = self.parts();
        warn!(status = status.as_u16(), %message, "request failed");

        (
            status,
            Json(ApiResponse {
                code: status.as_u16(),
                message,
                data,
            }),
        )
            .into_response()
    }
}
