use std::sync::Arc;

use crate::{config::Config, upstream::VideoParser};

#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<dyn VideoParser + Send + Sync>,
    pub service_api_key: Arc<str>,
    pub passthrough_errors: bool,
}

impl AppState {
    pub fn new(parser: Arc<dyn VideoParser + Send + Sync>, config: &Config) -> Self {
        Self {
            parser,
            service_api_key: Arc::from(config.service_api_key()),
            passthrough_errors: config.passthrough_errors(),
        }
    }
}
