use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{api::errors::ApiError, app_state::AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request carried the service API key.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());
        let expected = state.service_api_key.clone();

        async move {
            let provided = provided.ok_or(ApiError::MissingApiKey)?;
            if provided.as_str() != &*expected {
                return Err(ApiError::InvalidApiKey);
            }
            Ok(ApiKey)
        }
    }
}
