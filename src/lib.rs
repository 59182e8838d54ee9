//! # Sondeo (Lead Capture Quiz Service)
//!
//! `sondeo` serves a short marketing quiz and collects the contact details of
//! the people who answer it. The public surface is two endpoints: the active
//! questions and the submission that registers a participant.
//!
//! ## Participants
//!
//! A submission needs a name, an email and a phone number. Emails are
//! normalized to lowercase before storage, and both the email and the phone
//! number are unique per participant. A repeated submission is answered with
//! a friendly duplicate error instead of a second row.
//!
//! ## Admin Dashboard
//!
//! Everything under `/admin` and `/api/admin` sits behind a session gate.
//! Sessions are stateless: the cookie carries `username:issued-at` signed
//! with HMAC-SHA256 under the server secret, so no session table exists and
//! restarts keep admins logged in as long as the secret stays the same.
//! Unauthenticated browser requests are redirected to the login page with
//! the original path in the `next` query parameter.
//!
//! The signing secret has no fallback. The server refuses to start without
//! one, which keeps forged-cookie setups from ever going unnoticed.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
