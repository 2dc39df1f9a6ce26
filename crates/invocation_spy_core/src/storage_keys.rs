use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const ARTIFACT_KEY_SUFFIX: &str = ".json";

const ANONYMOUS_TOKEN_PREFIX: &str = "anon";

static KEY_SEQUENCE: AtomicU64 = AtomicU64::new(0);

pub fn artifact_object_key(function_name: &str, unique_segment: &str) -> String {
    format!("{function_name}/{unique_segment}{ARTIFACT_KEY_SUFFIX}")
}

/// Builds the per-invocation part of an artifact key.
///
/// The segment combines the caller's request token (or a random discriminator
/// when there is none) with wall-clock millis, a process-wide sequence number
/// and a random nonce. The sequence alone keeps keys distinct within one
/// process, including concurrent callers.
pub fn unique_segment(token: Option<&str>) -> String {
    let token = match token.map(str::trim) {
        Some(value) if !value.is_empty() => sanitize_token(value),
        _ => anonymous_token(),
    };
    let sequence = KEY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let nonce: u32 = rand::random();

    format!("{token}-{}-{sequence}-{nonce:08x}", unix_millis())
}

fn sanitize_token(token: &str) -> String {
    token
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

fn anonymous_token() -> String {
    format!("{ANONYMOUS_TOKEN_PREFIX}-{:016x}", rand::random::<u64>())
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0)
}
