//! Wire types for questions and participants.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// One selectable answer within a question.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestionOption {
    pub id: String,
    pub label: String,
}

/// A quiz question as returned by the API.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct QuestionResponse {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub options: Vec<QuestionOption>,
    pub order: i32,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for creating a question. Everything except the title is optional
/// and falls back to the stored defaults.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct CreateQuestionRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<QuestionOption>>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// A quiz participant as returned by the API.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ParticipantResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub place: Option<String>,
    pub answers: HashMap<String, String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload submitted from the public quiz form.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct CreateParticipantRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub answers: HashMap<String, String>,
}
