use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use super::{DOMAINS, Platform, SHORT_DOMAINS};

static SHARE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^\s，。！？、；：“”‘’【】《》（）「」『』…]+")
        .expect("Failed to compile share url regex")
});

/// Pull the first http(s) URL out of pasted share text.
///
/// Apps put the link in the middle of a blurb like
/// `"7.43 复制打开抖音，看看【...】 https://v.douyin.com/iRNBho6/ ..."`. The URL
/// runs up to whitespace or CJK punctuation, so non-ASCII paths survive intact.
/// Input without an embedded URL comes back trimmed and otherwise untouched.
pub fn extract_share_url(text: &str) -> String {
    let text = text.trim();
    SHARE_URL_REGEX
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| text.to_string())
}

/// Map a share URL to its platform.
///
/// Returns `None` for unrelated hosts and for anything that does not parse as
/// an absolute URL.
pub fn resolve(url: &str) -> Option<Platform> {
    let parsed = match Url::parse(url.trim()) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(url, error = %e, "not a parseable url");
            return None;
        }
    };
    let host = parsed.host_str()?;
    let platform = resolve_host(host, SHORT_DOMAINS, DOMAINS);
    if platform.is_none() {
        debug!(host, "no platform for host");
    }
    platform
}

fn resolve_host(
    host: &str,
    short_domains: &[(&str, Platform)],
    domains: &[(&str, Platform)],
) -> Option<Platform> {
    if let Some((_, platform)) = short_domains.iter().find(|(domain, _)| *domain == host) {
        return Some(*platform);
    }

    let host = host.strip_prefix("www.").unwrap_or(host);
    domains
        .iter()
        .find(|(domain, _)| host.contains(domain))
        .map(|(_, platform)| *platform)
}
