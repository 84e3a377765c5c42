//! Platform identification for share links.
//!
//! Three static tables drive everything here: exact short-link hosts, canonical
//! domains matched by substring, and the upstream endpoint for each platform.
//! All of them draw from the same closed [`Platform`] enum.

pub mod resolve;

pub use resolve::{extract_share_url, resolve};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Douyin,
    Kuaishou,
    Xiaohongshu,
    Bilibili,
    Weibo,
    Toutiao,
    Xigua,
    Pipixia,
    Weishi,
    /// Recognized by domain but not served by the upstream provider.
    Huoshan,
}

/// Short-link redirector hosts. Matched exactly, before [`DOMAINS`].
pub const SHORT_DOMAINS: &[(&str, Platform)] = &[
    ("v.douyin.com", Platform::Douyin),
    ("w.kuaishou.com", Platform::Kuaishou),
    ("xhsurl.com", Platform::Xiaohongshu),
    ("t.cn", Platform::Weibo),
    ("b23.tv", Platform::Bilibili),
    ("h5.pipix.com", Platform::Pipixia),
    ("isee.weishi.qq.com", Platform::Weishi),
    ("m.toutiao.com", Platform::Toutiao),
];

/// Canonical domains, matched as substrings of the host in this order.
pub const DOMAINS: &[(&str, Platform)] = &[
    ("douyin.com", Platform::Douyin),
    ("iesdouyin.com", Platform::Douyin),
    ("kuaishou.com", Platform::Kuaishou),
    ("xiaohongshu.com", Platform::Xiaohongshu),
    ("xhslink.com", Platform::Xiaohongshu),
    ("bilibili.com", Platform::Bilibili),
    ("weibo.com", Platform::Weibo),
    ("weibo.cn", Platform::Weibo),
    ("ixigua.com", Platform::Xigua),
    ("huoshan.com", Platform::Huoshan),
    ("pipix.com", Platform::Pipixia),
    ("weishi.qq.com", Platform::Weishi),
    ("toutiao.com", Platform::Toutiao),
];

/// Upstream path segment per platform. Platforms missing here are unsupported.
pub const ENDPOINTS: &[(Platform, &str)] = &[
    (Platform::Douyin, "douyin"),
    (Platform::Kuaishou, "kuaishou"),
    (Platform::Xiaohongshu, "xiaohongshu"),
    (Platform::Bilibili, "bilibili"),
    (Platform::Weibo, "weibo"),
    (Platform::Xigua, "xigua"),
    (Platform::Pipixia, "pipix"),
    (Platform::Weishi, "weishi"),
    (Platform::Toutiao, "toutiao"),
];

impl Platform {
    pub const ALL: [Platform; 10] = [
        Platform::Douyin,
        Platform::Kuaishou,
        Platform::Xiaohongshu,
        Platform::Bilibili,
        Platform::Weibo,
        Platform::Toutiao,
        Platform::Xigua,
        Platform::Pipixia,
        Platform::Weishi,
        Platform::Huoshan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Douyin => "douyin",
            Platform::Kuaishou => "kuaishou",
            Platform::Xiaohongshu => "xiaohongshu",
            Platform::Bilibili => "bilibili",
            Platform::Weibo => "weibo",
            Platform::Toutiao => "toutiao",
            Platform::Xigua => "xigua",
            Platform::Pipixia => "pipixia",
            Platform::Weishi => "weishi",
            Platform::Huoshan => "huoshan",
        }
    }

    /// Human-readable name as the platform presents itself.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Douyin => "抖音",
            Platform::Kuaishou => "快手",
            Platform::Xiaohongshu => "小红书",
            Platform::Bilibili => "哔哩哔哩",
            Platform::Weibo => "微博",
            Platform::Toutiao => "今日头条",
            Platform::Xigua => "西瓜视频",
            Platform::Pipixia => "皮皮虾",
            Platform::Weishi => "微视",
            Platform::Huoshan => "火山",
        }
    }

    pub fn endpoint(&self) -> Option<&'static str> {
        ENDPOINTS
            .iter()
            .find(|(platform, _)| platform == self)
            .map(|(_, endpoint)| *endpoint)
    }

    pub fn is_supported(&self) -> bool {
        self.endpoint().is_some()
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|platform| platform.as_str() == token)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}
