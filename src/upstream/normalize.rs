//! Reshaping of provider payloads into [`NormalizedVideo`].
//!
//! The provider names the same thing differently per platform, so every
//! logical field has an ordered list of candidate keys and the first one
//! present wins. A shape we can't read fails the whole record.

use serde_json::{Map, Value};

use super::{
    errors::UpstreamError,
    types::{Author, NormalizedVideo, Statistics},
};
use crate::platform::Platform;

const TITLE_KEYS: &[&str] = &["title"];
const DESCRIPTION_KEYS: &[&str] = &["desc", "description"];
const COVER_KEYS: &[&str] = &["cover", "cover_url"];
const VIDEO_URL_KEYS: &[&str] = &["url", "video_url", "playAddr", "work_url"];

const WEIBO_PREFERRED_RESOLUTION: &str = "高清 720P";
const TOUTIAO_PREFERRED_DEFINITION: &str = "720p";

type Object = Map<String, Value>;

/// Build a [`NormalizedVideo`] from a successful provider response body.
pub fn normalize(
    platform: Platform,
    original_url: &str,
    body: &Value,
) -> Result<NormalizedVideo, UpstreamError> {
    let empty = Object::new();
    let data = match body.get("data") {
        None => &empty,
        Some(Value::Object(data)) => data,
        Some(other) => {
            return Err(UpstreamError::Normalize(format!(
                "data is {}, expected an object",
                kind(other)
            )));
        }
    };

    let author = object_field(data, "author")?;
    let music = object_field(data, "music")?;
    let statistics = object_field(data, "statistics")?;

    let author_name = match author.and_then(|a| a.get("name")) {
        Some(name) => as_string(name, "author.name")?,
        None => string_field(data, &["username"])?,
    };

    Ok(NormalizedVideo {
        platform,
        platform_name: platform.display_name().to_string(),
        title: string_field(data, TITLE_KEYS)?,
        description: string_field(data, DESCRIPTION_KEYS)?,
        cover_url: string_field(data, COVER_KEYS)?,
        author: Author {
            name: author_name,
            avatar: nested_string(author, "avatar", "author.avatar")?,
        },
        video_url: video_url(platform, data)?,
        music_url: nested_string(music, "url", "music.url")?,
        statistics: Statistics {
            likes: count_field(statistics, "like_count")?,
            comments: count_field(statistics, "comment_count")?,
            shares: count_field(statistics, "share_count")?,
        },
        original_url: original_url.to_string(),
        raw_data: Value::Object(data.clone()),
    })
}

fn video_url(platform: Platform, data: &Object) -> Result<String, UpstreamError> {
    match (platform, data.get("video_url")) {
        (Platform::Weibo, Some(Value::Object(resolutions))) => weibo_video_url(resolutions),
        (Platform::Toutiao, Some(Value::Array(definitions))) => toutiao_video_url(definitions),
        _ => string_field(data, VIDEO_URL_KEYS),
    }
}

/// Weibo keys the URL by resolution label.
fn weibo_video_url(resolutions: &Object) -> Result<String, UpstreamError> {
    let chosen = resolutions
        .get(WEIBO_PREFERRED_RESOLUTION)
        .or_else(|| resolutions.values().next())
        .ok_or_else(|| UpstreamError::Normalize("video_url has no resolutions".to_string()))?;
    as_string(chosen, "video_url")
}

/// Toutiao returns a list of `{definition, url}`.
fn toutiao_video_url(definitions: &[Value]) -> Result<String, UpstreamError> {
    let mut entries = Vec::with_capacity(definitions.len());
    for entry in definitions {
        let entry = entry.as_object().ok_or_else(|| {
            UpstreamError::Normalize(format!("video_url entry is {}", kind(entry)))
        })?;
        entries.push(entry);
    }

    let chosen = entries
        .iter()
        .copied()
        .find(|entry| {
            entry.get("definition").and_then(Value::as_str) == Some(TOUTIAO_PREFERRED_DEFINITION)
        })
        .or_else(|| entries.first().copied())
        .ok_or_else(|| UpstreamError::Normalize("video_url has no definitions".to_string()))?;

    nested_string(Some(chosen), "url", "video_url.url")
}

fn object_field<'a>(data: &'a Object, key: &str) -> Result<Option<&'a Object>, UpstreamError> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::Object(object)) => Ok(Some(object)),
        Some(other) => Err(UpstreamError::Normalize(format!(
            "{key} is {}, expected an object",
            kind(other)
        ))),
    }
}

fn string_field(data: &Object, keys: &[&str]) -> Result<String, UpstreamError> {
    keys.iter()
        .find_map(|key| data.get(*key).map(|value| (*key, value)))
        .map(|(key, value)| as_string(value, key))
        .unwrap_or_else(|| Ok(String::new()))
}

fn nested_string(object: Option<&Object>, key: &str, label: &str) -> Result<String, UpstreamError> {
    match object.and_then(|o| o.get(key)) {
        Some(value) => as_string(value, label),
        None => Ok(String::new()),
    }
}

fn as_string(value: &Value, label: &str) -> Result<String, UpstreamError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        other => Err(UpstreamError::Normalize(format!(
            "{label} is {}, expected a string",
            kind(other)
        ))),
    }
}

fn count_field(statistics: Option<&Object>, key: &str) -> Result<u64, UpstreamError> {
    let Some(value) = statistics.and_then(|s| s.get(key)) else {
        return Ok(0);
    };
    let invalid = || UpstreamError::Normalize(format!("statistics.{key} is not a count: {value}"));

    match value {
        Value::Null => Ok(0),
        Value::Number(n) => n.as_u64().ok_or_else(invalid),
        Value::String(s) => s.trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
