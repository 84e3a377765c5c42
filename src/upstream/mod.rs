pub mod backoff;
pub mod client;
pub mod errors;
pub mod normalize;
pub mod types;

pub use client::{UpstreamClient, UpstreamConfig, VideoParser};
pub use errors::{ParseError, UpstreamError};
pub use normalize::normalize;
pub use types::{Author, NormalizedVideo, Statistics};
