//! Admin dashboard configuration shared across handlers and middleware.

use secrecy::{ExposeSecret, SecretString};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub(crate) const DEFAULT_SESSION_TTL_SECONDS: i64 = 8 * 60 * 60;

/// Runtime configuration for the admin surface: credentials, the token
/// signing secret and cookie parameters.
#[derive(Clone, Debug)]
pub struct AdminConfig {
    username: String,
    password: SecretString,
    session_secret: SecretString,
    base_url: String,
    session_ttl_seconds: i64,
}

impl AdminConfig {
    /// Build a configuration around the mandatory signing secret. Credentials
    /// stay empty until set, which keeps the login endpoint disabled.
    #[must_use]
    pub fn new(session_secret: SecretString) -> Self {
        Self {
            username: String::new(),
            password: SecretString::from(String::new()),
            session_secret,
            base_url: DEFAULT_BASE_URL.to_string(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_username(mut self, username: String) -> Self {
        self.username = username;
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: SecretString) -> Self {
        self.password = password;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, session_ttl_seconds: i64) -> Self {
        self.session_ttl_seconds = session_ttl_seconds;
        self
    }

    /// Both credential halves must be non-empty before logins are accepted.
    pub(crate) fn credentials_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.expose_secret().is_empty()
    }

    /// Plain string equality on both halves; only the token signature gets a
    /// constant-time comparison.
    pub(crate) fn matches_credentials(&self, username: &str, password: &str) -> bool {
        self.credentials_configured()
            && self.username == username
            && self.password.expose_secret() == password
    }

    pub(crate) fn session_secret(&self) -> &[u8] {
        self.session_secret.expose_secret().as_bytes()
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    /// Session cookies are marked `Secure` whenever the service is reachable
    /// over https.
    pub(crate) fn session_cookie_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_config_defaults_and_overrides() {
        let config = AdminConfig::new(SecretString::from("secret".to_string()));

        assert!(!config.credentials_configured());
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(config.session_ttl_seconds(), 28_800);
        assert!(!config.session_cookie_secure());
        assert_eq!(config.session_secret(), b"secret");

        let config = config
            .with_username("admin".to_string())
            .with_password(SecretString::from("hunter2".to_string()))
            .with_base_url("https://quiz.example.com".to_string())
            .with_session_ttl_seconds(600);

        assert!(config.credentials_configured());
        assert_eq!(config.base_url(), "https://quiz.example.com");
        assert_eq!(config.session_ttl_seconds(), 600);
        assert!(config.session_cookie_secure());
    }

    #[test]
    fn credentials_require_both_halves() {
        let config = AdminConfig::new(SecretString::from("secret".to_string()))
            .with_username("admin".to_string());

        assert!(!config.credentials_configured());
        assert!(!config.matches_credentials("admin", ""));

        let config = config.with_password(SecretString::from("hunter2".to_string()));

        assert!(config.matches_credentials("admin", "hunter2"));
        assert!(!config.matches_credentials("admin", "wrong"));
        assert!(!config.matches_credentials("root", "hunter2"));
    }
}
