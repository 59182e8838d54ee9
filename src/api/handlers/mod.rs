//! HTTP handlers.

pub mod auth;
pub mod health;
pub mod quiz;
pub mod root;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic success body, `{"ok": true}`.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct OkResponse {
    pub ok: bool,
}

/// Generic error body, `{"error": "..."}`.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Lightweight email shape check: something@something.tld, no whitespace.
pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Emails are compared and stored lowercase.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(valid_email("user@example.com"));
        assert!(valid_email("user.name+tag@sub.example.co"));

        assert!(!valid_email("user@example"));
        assert!(!valid_email("user example.com"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email("user@"));
        assert!(!valid_email(""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
        assert_eq!(normalize_email("ada@example.com"), "ada@example.com");
        assert_eq!(normalize_email("   "), "");
    }

    #[test]
    fn test_response_bodies() -> Result<(), serde_json::Error> {
        let ok = serde_json::to_string(&OkResponse { ok: true })?;

        assert_eq!(ok, r#"{"ok":true}"#);

        let error = serde_json::to_string(&ErrorResponse::new("Invalid credentials"))?;

        assert_eq!(error, r#"{"error":"Invalid credentials"}"#);

        Ok(())
    }
}
