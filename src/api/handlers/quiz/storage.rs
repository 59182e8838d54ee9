//! Postgres persistence for questions and participants.

use super::types::{ParticipantResponse, QuestionOption, QuestionResponse};
use crate::api::handlers::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::HashMap;
use tracing::{Instrument, error, info_span};
use uuid::Uuid;

/// Admin listings return at most this many participants, newest first.
const PARTICIPANTS_PAGE_SIZE: i64 = 200;

const DUPLICATE_PARTICIPANT: &str =
    "A participant with this email or phone number already exists";

const TIMESTAMP_FORMAT: &str = r#"'YYYY-MM-DD"T"HH24:MI:SS"Z"'"#;

#[derive(Debug)]
pub(super) enum QuizError {
    Conflict(&'static str),
    Database(sqlx::Error),
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        match self {
            Self::Conflict(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
            }

            Self::Database(error) => {
                error!("Database error: {error}");

                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// New question row, already validated and defaulted by the handler.
pub(super) struct NewQuestion {
    pub title: String,
    pub subtitle: Option<String>,
    pub options: Vec<QuestionOption>,
    pub order: i32,
    pub active: bool,
}

/// New participant row, already validated and normalized by the handler.
pub(super) struct NewParticipant {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub place: Option<String>,
    pub answers: HashMap<String, String>,
}

/// Create the tables when they do not exist yet. Runs at startup on a lazy
/// pool, so a missing database only surfaces once requests arrive.
pub(crate) async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    const QUESTIONS: &str = "CREATE TABLE IF NOT EXISTS questions (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        subtitle TEXT,
        options JSONB NOT NULL DEFAULT '[]'::jsonb,
        sort_order INTEGER NOT NULL DEFAULT 0,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )";

    const PARTICIPANTS: &str = "CREATE TABLE IF NOT EXISTS participants (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        phone TEXT NOT NULL UNIQUE,
        place TEXT,
        answers JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )";

    for query in [QUESTIONS, PARTICIPANTS] {
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "CREATE",
            db.statement = query
        );

        sqlx::query(query).execute(pool).instrument(span).await?;
    }

    Ok(())
}

fn question_columns() -> String {
    format!(
        "id::text AS id, title, subtitle, options, sort_order, active, \
         to_char(created_at AT TIME ZONE 'utc', {TIMESTAMP_FORMAT}) AS created_at, \
         to_char(updated_at AT TIME ZONE 'utc', {TIMESTAMP_FORMAT}) AS updated_at"
    )
}

fn participant_columns() -> String {
    format!(
        "id::text AS id, name, email, phone, place, answers, \
         to_char(created_at AT TIME ZONE 'utc', {TIMESTAMP_FORMAT}) AS created_at, \
         to_char(updated_at AT TIME ZONE 'utc', {TIMESTAMP_FORMAT}) AS updated_at"
    )
}

fn question_from_row(row: &PgRow) -> QuestionResponse {
    let options: sqlx::types::Json<Vec<QuestionOption>> = row.get("options");

    QuestionResponse {
        id: row.get("id"),
        title: row.get("title"),
        subtitle: row.get("subtitle"),
        options: options.0,
        order: row.get("sort_order"),
        active: row.get("active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn participant_from_row(row: &PgRow) -> ParticipantResponse {
    let answers: sqlx::types::Json<HashMap<String, String>> = row.get("answers");

    ParticipantResponse {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        place: row.get("place"),
        answers: answers.0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Questions shown to quiz takers: active only, in display order.
pub(super) async fn fetch_active_questions(
    pool: &PgPool,
) -> Result<Vec<QuestionResponse>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM questions WHERE active ORDER BY sort_order, created_at",
        question_columns()
    );

    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );

    let rows = sqlx::query(&query).fetch_all(pool).instrument(span).await?;

    Ok(rows.iter().map(question_from_row).collect())
}

/// Every question, inactive ones included, for the admin dashboard.
pub(super) async fn fetch_all_questions(
    pool: &PgPool,
) -> Result<Vec<QuestionResponse>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM questions ORDER BY sort_order, created_at",
        question_columns()
    );

    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );

    let rows = sqlx::query(&query).fetch_all(pool).instrument(span).await?;

    Ok(rows.iter().map(question_from_row).collect())
}

pub(super) async fn insert_question(
    pool: &PgPool,
    question: NewQuestion,
) -> Result<QuestionResponse, sqlx::Error> {
    let query = format!(
        "INSERT INTO questions (id, title, subtitle, options, sort_order, active) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        question_columns()
    );

    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );

    let row = sqlx::query(&query)
        .bind(Uuid::new_v4())
        .bind(&question.title)
        .bind(&question.subtitle)
        .bind(sqlx::types::Json(&question.options))
        .bind(question.order)
        .bind(question.active)
        .fetch_one(pool)
        .instrument(span)
        .await?;

    Ok(question_from_row(&row))
}

/// Delete a question, reporting whether a row existed.
pub(super) async fn delete_question(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let query = "DELETE FROM questions WHERE id = $1";

    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );

    let result = sqlx::query(query)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Latest participants for the admin dashboard.
pub(super) async fn fetch_participants(
    pool: &PgPool,
) -> Result<Vec<ParticipantResponse>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM participants ORDER BY created_at DESC LIMIT $1",
        participant_columns()
    );

    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );

    let rows = sqlx::query(&query)
        .bind(PARTICIPANTS_PAGE_SIZE)
        .fetch_all(pool)
        .instrument(span)
        .await?;

    Ok(rows.iter().map(participant_from_row).collect())
}

/// Insert a participant, refusing duplicates by email or phone.
///
/// The pre-check gives the friendly error for the common case. The unique
/// indexes stay authoritative, so a race between two submissions still maps
/// to the same conflict.
pub(super) async fn insert_participant(
    pool: &PgPool,
    participant: NewParticipant,
) -> Result<ParticipantResponse, QuizError> {
    let query = "SELECT EXISTS(SELECT 1 FROM participants WHERE email = $1 OR phone = $2) AS taken";

    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );

    let taken: bool = sqlx::query(query)
        .bind(&participant.email)
        .bind(&participant.phone)
        .fetch_one(pool)
        .instrument(span)
        .await
        .map_err(QuizError::Database)?
        .get("taken");

    if taken {
        return Err(QuizError::Conflict(DUPLICATE_PARTICIPANT));
    }

    let query = format!(
        "INSERT INTO participants (id, name, email, phone, place, answers) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        participant_columns()
    );

    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );

    let row = sqlx::query(&query)
        .bind(Uuid::new_v4())
        .bind(&participant.name)
        .bind(&participant.email)
        .bind(&participant.phone)
        .bind(&participant.place)
        .bind(sqlx::types::Json(&participant.answers))
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(participant_from_row(&row)),
        Err(error) if is_unique_violation(&error) => {
            Err(QuizError::Conflict(DUPLICATE_PARTICIPANT))
        }
        Err(error) => Err(QuizError::Database(error)),
    }
}

pub(super) async fn fetch_participant(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ParticipantResponse>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM participants WHERE id = $1",
        participant_columns()
    );

    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );

    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.as_ref().map(participant_from_row))
}

/// Delete a participant, reporting whether a row existed.
pub(super) async fn delete_participant(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let query = "DELETE FROM participants WHERE id = $1";

    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );

    let result = sqlx::query(query)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Postgres unique violations carry SQLSTATE 23505.
fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => {
            db_error.code().as_deref() == Some("23505")
        }

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::borrow::Cow;

    #[derive(Debug)]
    struct TestDbError {
        code: Option<String>,
    }

    impl std::fmt::Display for TestDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "test database error")
        }
    }

    impl std::error::Error for TestDbError {}

    impl sqlx::error::DatabaseError for TestDbError {
        fn message(&self) -> &str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.as_deref().map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }
    }

    fn database_error(code: Option<&str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(TestDbError {
            code: code.map(str::to_string),
        }))
    }

    #[test]
    fn unique_violation_matches_sqlstate() {
        assert!(is_unique_violation(&database_error(Some("23505"))));
        assert!(!is_unique_violation(&database_error(Some("23503"))));
        assert!(!is_unique_violation(&database_error(None)));
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn conflict_maps_to_bad_request_with_the_duplicate_message() {
        let response = QuizError::Conflict(DUPLICATE_PARTICIPANT).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();

        assert_eq!(
            String::from_utf8_lossy(&body),
            r#"{"error":"A participant with this email or phone number already exists"}"#
        );
    }

    #[test]
    fn database_error_maps_to_internal_error() {
        let response = QuizError::Database(sqlx::Error::RowNotFound).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn timestamps_render_as_utc_iso8601() {
        let columns = question_columns();

        assert!(columns.contains("AT TIME ZONE 'utc'"));
        assert!(columns.contains(r#""Z"') AS created_at"#));
        assert!(participant_columns().contains("id::text AS id"));
    }
}
