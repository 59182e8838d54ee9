//! Signed session tokens for the admin dashboard.
//!
//! A token is `payload.signature` where the signature is the lowercase hex
//! HMAC-SHA256 of the payload under the server session secret. Login tokens
//! carry `username:issued-at-millis` as their payload so the gate can reject
//! sessions older than the configured TTL without another secret round trip.

use anyhow::Result;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Sign a payload, returning `payload.signature`.
///
/// # Errors
///
/// Returns an error if the secret cannot seed the MAC.
pub(crate) fn sign_token(payload: &str, secret: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret)?;

    mac.update(payload.as_bytes());

    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(format!("{payload}.{signature}"))
}

/// Check a token signature, returning the payload when it is authentic.
///
/// The token is split on the first `.` so payloads containing the delimiter
/// still verify. Comparison runs over every byte regardless of where the
/// first mismatch sits.
pub(crate) fn verify_token<'a>(token: &'a str, secret: &[u8]) -> Option<&'a str> {
    let (payload, signature) = token.split_once('.')?;

    if payload.is_empty() || signature.is_empty() {
        return None;
    }

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;

    mac.update(payload.as_bytes());

    let expected = hex::encode(mac.finalize().into_bytes());

    if constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
        Some(payload)
    } else {
        None
    }
}

fn constant_time_eq(expected: &[u8], supplied: &[u8]) -> bool {
    if expected.len() != supplied.len() {
        return false;
    }

    let mut diff = 0u8;

    for (a, b) in expected.iter().zip(supplied) {
        diff |= a ^ b;
    }

    diff == 0
}

/// Payload for a freshly issued login token: `username:issued-at-millis`.
pub(crate) fn login_payload(username: &str) -> String {
    format!("{username}:{}", now_unix_millis())
}

/// Issue timestamp embedded in a login payload, taken from the segment after
/// the last `:` so usernames containing colons stay intact.
pub(crate) fn issued_at_millis(payload: &str) -> Option<i64> {
    payload.rsplit_once(':')?.1.parse().ok()
}

/// Whether a login payload was issued within the last `ttl_seconds`.
///
/// Payloads without a parseable timestamp are treated as expired.
pub(crate) fn issued_within(payload: &str, ttl_seconds: i64) -> bool {
    issued_at_millis(payload)
        .is_some_and(|issued| now_unix_millis() - issued <= ttl_seconds.saturating_mul(1000))
}

fn now_unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
