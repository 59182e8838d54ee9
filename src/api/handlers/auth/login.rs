//! Admin login and logout handlers.

use super::{
    session::{clear_session_cookie, session_cookie},
    state::AdminConfig,
    token,
    types::LoginRequest,
};
use crate::api::handlers::{ErrorResponse, OkResponse};
use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{error, info};

/// Sign in to the admin dashboard
///
/// Checks the submitted credentials against the configured admin account and
/// issues a signed session cookie on success. Absent or malformed bodies are
/// treated as empty credentials.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie issued", body = OkResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Admin credentials not configured", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn login(
    Extension(config): Extension<Arc<AdminConfig>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let LoginRequest { username, password } = payload.map(|Json(body)| body).unwrap_or_default();

    if !config.credentials_configured() {
        error!("Admin credentials are not configured, rejecting login");

        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Admin credentials not configured")),
        )
            .into_response();
    }

    if !config.matches_credentials(&username, &password) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid credentials")),
        )
            .into_response();
    }

    let payload = token::login_payload(&username);

    let token = match token::sign_token(&payload, config.session_secret()) {
        Ok(token) => token,
        Err(error) => {
            error!("Failed to sign session token: {error}");

            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut headers = HeaderMap::new();

    match session_cookie(&config, &token) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }

        Err(error) => {
            error!("Failed to build session cookie: {error}");

            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    info!("Admin session opened for {}", username);

    (StatusCode::OK, headers, Json(OkResponse { ok: true })).into_response()
}

/// Sign out of the admin dashboard
///
/// Clears the session cookie. The gate keeps this endpoint behind a valid
/// session, so an expired cookie redirects to the login page instead.
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = OkResponse)
    ),
    tag = "admin"
)]
pub async fn logout(Extension(config): Extension<Arc<AdminConfig>>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();

    match clear_session_cookie(&config) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }

        Err(error) => {
            error!("Failed to build session cookie: {error}");

            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    (StatusCode::OK, headers, Json(OkResponse { ok: true })).into_response()
}
