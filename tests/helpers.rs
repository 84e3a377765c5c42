#![allow(dead_code)]

use axum::Router;
use std::{sync::Arc, time::Duration};

use vidproxy::{
    api,
    app_state::AppState,
    upstream::{UpstreamClient, UpstreamConfig},
};

pub const UPSTREAM_KEY: &str = "upstream-test-key";
pub const SERVICE_KEY: &str = "service-test-key";

/// Upstream client pointed at a mock server, with millisecond backoff.
pub fn test_client(base_url: &str) -> UpstreamClient {
    let config = UpstreamConfig::new(UPSTREAM_KEY)
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5))
        .with_base_delay(Duration::from_millis(5));
    UpstreamClient::new(config).expect("Failed to build upstream client")
}

#[allow(dead_code)]
pub fn test_app(base_url: &str, passthrough_errors: bool) -> Router {
    let state = AppState {
        parser: Arc::new(test_client(base_url)),
        service_api_key: Arc::from(SERVICE_KEY),
        passthrough_errors,
    };
    api::router(state)
}
