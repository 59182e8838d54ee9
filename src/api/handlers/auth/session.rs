//! Session cookie helpers for the admin dashboard.

use super::state::AdminConfig;
use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};

pub(crate) const ADMIN_COOKIE_NAME: &str = "admin_token";

/// Build the `Set-Cookie` value carrying a signed admin token.
///
/// The cookie is HTTP-only, scoped to the whole site and `Lax` so the
/// dashboard keeps the session across top-level navigations. `Secure` is
/// added when the service runs behind https.
pub(super) fn session_cookie(
    config: &AdminConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();

    let mut cookie =
        format!("{ADMIN_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}");

    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
}

/// Build the `Set-Cookie` value that removes the admin session cookie.
pub(super) fn clear_session_cookie(
    config: &AdminConfig,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{ADMIN_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");

    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
}

/// Pull the admin token out of the `Cookie` header, if present.
pub(crate) fn extract_admin_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let mut parts = pair.splitn(2, '=');
        let name = parts.next()?.trim();
        let value = parts.next()?.trim();

        (name == ADMIN_COOKIE_NAME).then(|| value.to_string())
    })
}
