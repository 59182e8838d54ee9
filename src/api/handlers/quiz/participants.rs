//! Participant endpoints: the public quiz submission and the admin views.

use super::{
    storage,
    types::{CreateParticipantRequest, ParticipantResponse},
};
use crate::api::handlers::{ErrorResponse, OkResponse, normalize_email, valid_email};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

const PARTICIPANT_NOT_FOUND: &str = "Participant not found";

/// Submit quiz answers
///
/// Registers a participant from the public quiz form. Name, email and phone
/// are required, emails are normalized to lowercase, and a participant who
/// already registered with the same email or phone is rejected.
#[utoipa::path(
    post,
    path = "/api/participants",
    request_body = CreateParticipantRequest,
    responses(
        (status = 201, description = "Participant registered", body = ParticipantResponse),
        (status = 400, description = "Missing or duplicate fields", body = ErrorResponse),
        (status = 500, description = "Database error")
    ),
    tag = "quiz"
)]
pub async fn submit_participant(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CreateParticipantRequest>,
) -> impl IntoResponse {
    let name = payload.name.trim();
    let email = normalize_email(&payload.email);
    let phone = payload.phone.trim();

    if name.is_empty() || email.is_empty() || phone.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Name, email and phone are required")),
        )
            .into_response();
    }

    if !valid_email(&email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid email address")),
        )
            .into_response();
    }

    let place = payload
        .place
        .map(|place| place.trim().to_string())
        .filter(|place| !place.is_empty());

    let participant = storage::NewParticipant {
        name: name.to_string(),
        email,
        phone: phone.to_string(),
        place,
        answers: payload.answers,
    };

    match storage::insert_participant(&pool, participant).await {
        Ok(participant) => (StatusCode::CREATED, Json(participant)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// List participants
///
/// Admin view of the latest submissions, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/participants",
    responses(
        (status = 200, description = "Latest participants", body = [ParticipantResponse]),
        (status = 307, description = "Redirect to the login page"),
        (status = 500, description = "Database error")
    ),
    tag = "admin"
)]
pub async fn list_participants(Extension(pool): Extension<PgPool>) -> impl IntoResponse {
    match storage::fetch_participants(&pool).await {
        Ok(participants) => (StatusCode::OK, Json(participants)).into_response(),

        Err(error) => {
            error!("Failed to list participants: {error}");

            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Fetch one participant
///
/// Full detail for the admin dashboard, answers included.
#[utoipa::path(
    get,
    path = "/api/admin/participants/{id}",
    params(
        ("id" = String, Path, description = "Participant id")
    ),
    responses(
        (status = 200, description = "Participant detail", body = ParticipantResponse),
        (status = 307, description = "Redirect to the login page"),
        (status = 404, description = "Unknown participant", body = ErrorResponse),
        (status = 500, description = "Database error")
    ),
    tag = "admin"
)]
pub async fn get_participant(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(PARTICIPANT_NOT_FOUND)),
        )
            .into_response();
    };

    match storage::fetch_participant(&pool, id).await {
        Ok(Some(participant)) => (StatusCode::OK, Json(participant)).into_response(),

        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(PARTICIPANT_NOT_FOUND)),
        )
            .into_response(),

        Err(error) => {
            error!("Failed to fetch participant {id}: {error}");

            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Delete a participant
///
/// Deleting an unknown or malformed id still answers ok, matching the
/// idempotent dashboard behavior.
#[utoipa::path(
    delete,
    path = "/api/admin/participants/{id}",
    params(
        ("id" = String, Path, description = "Participant id")
    ),
    responses(
        (status = 200, description = "Participant removed if it existed", body = OkResponse),
        (status = 307, description = "Redirect to the login page"),
        (status = 500, description = "Database error")
    ),
    tag = "admin"
)]
pub async fn delete_participant(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return (StatusCode::OK, Json(OkResponse { ok: true })).into_response();
    };

    match storage::delete_participant(&pool, id).await {
        Ok(_) => (StatusCode::OK, Json(OkResponse { ok: true })).into_response(),

        Err(error) => {
            error!("Failed to delete participant {id}: {error}");

            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://127.0.0.1:1/unreachable")
            .expect("static dsn parses")
    }

    async fn error_message(response: axum::response::Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();

        serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value["error"].as_str().map(str::to_string))
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn submit_requires_name_email_and_phone() {
        let payload = Json(CreateParticipantRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ..CreateParticipantRequest::default()
        });

        let response = submit_participant(Extension(lazy_pool()), payload)
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_message(response).await,
            "Name, email and phone are required"
        );
    }

    #[tokio::test]
    async fn submit_rejects_invalid_email() {
        let payload = Json(CreateParticipantRequest {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            phone: "+34600000000".to_string(),
            ..CreateParticipantRequest::default()
        });

        let response = submit_participant(Extension(lazy_pool()), payload)
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_message(response).await, "Invalid email address");
    }

    #[tokio::test]
    async fn get_participant_treats_malformed_id_as_missing() {
        let response = get_participant(Extension(lazy_pool()), Path("42".to_string()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(response).await, "Participant not found");
    }

    #[tokio::test]
    async fn delete_participant_accepts_malformed_ids() {
        let response = delete_participant(Extension(lazy_pool()), Path("42".to_string()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
