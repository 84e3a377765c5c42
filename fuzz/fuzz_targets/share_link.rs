#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::Value;

use vidproxy::platform::{Platform, extract_share_url, resolve};
use vidproxy::upstream::normalize;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // Resolution must never panic, whatever gets pasted
    let url = extract_share_url(&text);
    let _ = resolve(&url);

    // Neither may normalization of an arbitrary provider body
    if let Ok(body) = serde_json::from_slice::<Value>(data) {
        for platform in Platform::ALL {
            let _ = normalize(platform, &url, &body);
        }
    }
});
