use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::platform::Platform;

/// Value of `platform` that asks for detection from the URL.
pub const AUTO_PLATFORM: &str = "auto";

#[derive(Debug, Deserialize, ToSchema)]
pub struct ParseRequest {
    /// Share link, or share text containing one.
    pub url: Option<String>,
    /// Platform id, or `"auto"` / absent to detect it.
    pub platform: Option<String>,
}

impl ParseRequest {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }

    /// `Ok(None)` means "detect"; an unknown id is handed back as the error.
    pub fn platform(&self) -> Result<Option<Platform>, String> {
        match self.platform.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(p) if p.eq_ignore_ascii_case(AUTO_PLATFORM) => Ok(None),
            Some(p) => p.parse().map(Some).map_err(|_| p.to_string()),
        }
    }
}

/// Envelope every endpoint answers with.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlatformInfo {
    pub id: Platform,
    pub name: String,
    pub endpoint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: Option<&str>, platform: Option<&str>) -> ParseRequest {
        ParseRequest {
            url: url.map(str::to_string),
            platform: platform.map(str::to_string),
        }
    }

    #[test]
    fn test_url_is_trimmed_and_required() {
        assert_eq!(request(Some(" https://b23.tv/x "), None).url(), Some("https://b23.tv/x"));
        assert_eq!(request(Some("   "), None).url(), None);
        assert_eq!(request(None, None).url(), None);
    }

    #[test]
    fn test_auto_and_missing_platform_mean_detect() {
        assert_eq!(request(None, None).platform(), Ok(None));
        assert_eq!(request(None, Some("auto")).platform(), Ok(None));
        assert_eq!(request(None, Some("AUTO")).platform(), Ok(None));
        assert_eq!(request(None, Some("")).platform(), Ok(None));
    }

    #[test]
    fn test_explicit_platform() {
        assert_eq!(request(None, Some("weibo")).platform(), Ok(Some(Platform::Weibo)));
        assert_eq!(
            request(None, Some("tiktok")).platform(),
            Err("tiktok".to_string())
        );
    }

    #[test]
    fn test_envelope_serializes_null_data() {
        let response: ApiResponse<()> = ApiResponse {
            code: 404,
            message: "not found".to_string(),
            data: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"code": 404, "message": "not found", "data": null})
        );
    }
}
