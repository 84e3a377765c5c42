use std::time::Duration;

const MAX_EXPONENT: u32 = 10;

/// Delay before retry number `retry` (1-based): `base * 2^retry`.
pub fn backoff_delay(retry: u32, base: Duration) -> Duration {
    // Cap the exponent so a misconfigured retry count can't overflow
    let capped = retry.min(MAX_EXPONENT);
    base.saturating_mul(2_u32.saturating_pow(capped))
}
