//! Request gate protecting the admin dashboard and its API.
//!
//! Every request under `/admin` or `/api/admin` must carry a valid, fresh
//! session cookie. The login page and login endpoint stay reachable so a
//! locked-out admin can still sign in. Everything else passes through
//! untouched.

use super::{session::extract_admin_token, state::AdminConfig, token};
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

const LOGIN_PAGE: &str = "/admin/login";
const LOGIN_API_PREFIX: &str = "/api/admin/login";

/// Middleware guarding the admin surface.
///
/// Unauthenticated requests are redirected to the login page with the
/// original path preserved in the `next` query parameter.
pub async fn admin_gate(
    Extension(config): Extension<Arc<AdminConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if !is_protected(&path) || is_login_path(&path) {
        return next.run(request).await;
    }

    let authorized = match extract_admin_token(request.headers()) {
        Some(cookie) => token::verify_token(&cookie, config.session_secret())
            .is_some_and(|payload| token::issued_within(payload, config.session_ttl_seconds())),
        None => false,
    };

    if authorized {
        return next.run(request).await;
    }

    debug!("Redirecting unauthenticated request for {} to login", path);

    redirect_to_login(&path).into_response()
}

fn redirect_to_login(path: &str) -> Redirect {
    let next_param: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();

    Redirect::temporary(&format!("{LOGIN_PAGE}?next={next_param}"))
}

/// Whole path segments only, so `/administrator` stays public.
fn is_protected(path: &str) -> bool {
    matches_segment(path, "/admin") || matches_segment(path, "/api/admin")
}

fn matches_segment(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn is_login_path(path: &str) -> bool {
    path == LOGIN_PAGE || path.starts_with(LOGIN_API_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        middleware,
        routing::get,
    };
    use secrecy::SecretString;
    use tower::{ServiceBuilder, ServiceExt};

    fn gated_app(config: AdminConfig) -> Router {
        let stack = ServiceBuilder::new()
            .layer(Extension(Arc::new(config)))
            .layer(middleware::from_fn(admin_gate));

        Router::new().route("/admin", get(|| async {})).layer(stack)
    }

    #[test]
    fn protected_paths_cover_dashboard_and_api() {
        assert!(is_protected("/admin"));
        assert!(is_protected("/admin/participants"));
        assert!(is_protected("/admin/questions/42"));
        assert!(is_protected("/api/admin"));
        assert!(is_protected("/api/admin/participants"));
    }

    #[test]
    fn public_paths_are_not_protected() {
        assert!(!is_protected("/"));
        assert!(!is_protected("/api/questions"));
        assert!(!is_protected("/api/participants"));
        assert!(!is_protected("/administrator"));
        assert!(!is_protected("/api/administrators"));
        assert!(!is_protected("/health"));
    }

    #[test]
    fn login_paths_bypass_the_gate() {
        assert!(is_login_path("/admin/login"));
        assert!(is_login_path("/api/admin/login"));
        assert!(is_login_path("/api/admin/login/refresh"));

        assert!(!is_login_path("/admin/login2"));
        assert!(!is_login_path("/admin"));
        assert!(!is_login_path("/api/admin/logout"));
    }

    #[test]
    fn redirect_preserves_requested_path() {
        let response = redirect_to_login("/admin/participants").into_response();

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        assert_eq!(location, "/admin/login?next=%2Fadmin%2Fparticipants");
    }

    #[tokio::test]
    async fn stale_signed_cookie_is_redirected_to_login() -> Result<()> {
        let app = gated_app(AdminConfig::new(SecretString::from("gate-secret".to_string())));

        // Valid signature over an issue time far beyond any session TTL.
        let stale = token::sign_token("admin:1000", b"gate-secret")?;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin")
                    .header(header::COOKIE, format!("admin_token={stale}"))
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        assert_eq!(location, "/admin/login?next=%2Fadmin");

        Ok(())
    }

    #[tokio::test]
    async fn fresh_signed_cookie_passes_the_gate() -> Result<()> {
        let app = gated_app(AdminConfig::new(SecretString::from("gate-secret".to_string())));

        let fresh = token::sign_token(&token::login_payload("admin"), b"gate-secret")?;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin")
                    .header(header::COOKIE, format!("admin_token={fresh}"))
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::OK);

        Ok(())
    }
}
