use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::platform::Platform;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Author {
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Statistics {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

/// One video in the shape every platform is mapped onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NormalizedVideo {
    pub platform: Platform,
    pub platform_name: String,
    pub title: String,
    pub description: String,
    pub cover_url: String,
    pub author: Author,
    /// Watermark-free video file URL.
    pub video_url: String,
    pub music_url: String,
    pub statistics: Statistics,
    pub original_url: String,
    /// The provider's `data` object, untouched.
    #[schema(value_type = Object)]
    pub raw_data: Value,
}
