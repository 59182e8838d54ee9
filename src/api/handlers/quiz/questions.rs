//! Question endpoints: the public quiz listing and the admin CRUD.

use super::{
    storage,
    types::{CreateQuestionRequest, QuestionResponse},
};
use crate::api::handlers::{ErrorResponse, OkResponse};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

/// List active questions
///
/// The public quiz fetches its questions here, already sorted for display.
#[utoipa::path(
    get,
    path = "/api/questions",
    responses(
        (status = 200, description = "Active questions in display order", body = [QuestionResponse]),
        (status = 500, description = "Database error")
    ),
    tag = "quiz"
)]
pub async fn list_questions(Extension(pool): Extension<PgPool>) -> impl IntoResponse {
    match storage::fetch_active_questions(&pool).await {
        Ok(questions) => (StatusCode::OK, Json(questions)).into_response(),

        Err(error) => {
            error!("Failed to list questions: {error}");

            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// List all questions
///
/// Admin view of every question, inactive ones included.
#[utoipa::path(
    get,
    path = "/api/admin/questions",
    responses(
        (status = 200, description = "All questions in display order", body = [QuestionResponse]),
        (status = 307, description = "Redirect to the login page"),
        (status = 500, description = "Database error")
    ),
    tag = "admin"
)]
pub async fn list_all_questions(Extension(pool): Extension<PgPool>) -> impl IntoResponse {
    match storage::fetch_all_questions(&pool).await {
        Ok(questions) => (StatusCode::OK, Json(questions)).into_response(),

        Err(error) => {
            error!("Failed to list questions: {error}");

            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Create a question
///
/// Only the title is required. Order defaults to 0 and new questions start
/// active unless the payload says otherwise.
#[utoipa::path(
    post,
    path = "/api/admin/questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 307, description = "Redirect to the login page"),
        (status = 400, description = "Title is missing", body = ErrorResponse),
        (status = 500, description = "Database error")
    ),
    tag = "admin"
)]
pub async fn create_question(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> impl IntoResponse {
    let title = payload.title.trim();

    if title.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Question title is required")),
        )
            .into_response();
    }

    let subtitle = payload
        .subtitle
        .map(|subtitle| subtitle.trim().to_string())
        .filter(|subtitle| !subtitle.is_empty());

    let question = storage::NewQuestion {
        title: title.to_string(),
        subtitle,
        options: payload.options.unwrap_or_default(),
        order: payload.order.unwrap_or(0),
        active: payload.active.unwrap_or(true),
    };

    match storage::insert_question(&pool, question).await {
        Ok(question) => (StatusCode::CREATED, Json(question)).into_response(),

        Err(error) => {
            error!("Failed to create question: {error}");

            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Delete a question
///
/// Deleting an unknown or malformed id still answers ok, matching the
/// idempotent dashboard behavior.
#[utoipa::path(
    delete,
    path = "/api/admin/questions/{id}",
    params(
        ("id" = String, Path, description = "Question id")
    ),
    responses(
        (status = 200, description = "Question removed if it existed", body = OkResponse),
        (status = 307, description = "Redirect to the login page"),
        (status = 500, description = "Database error")
    ),
    tag = "admin"
)]
pub async fn delete_question(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return (StatusCode::OK, Json(OkResponse { ok: true })).into_response();
    };

    match storage::delete_question(&pool, id).await {
        Ok(_) => (StatusCode::OK, Json(OkResponse { ok: true })).into_response(),

        Err(error) => {
            error!("Failed to delete question {id}: {error}");

            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
