use super::handlers::{ErrorResponse, OkResponse, auth, health, quiz};
use utoipa::OpenApi;
use utoipa::openapi::{Contact, InfoBuilder, License, Tag};

/// Endpoints and schemas that make up the `OpenAPI` document.
///
/// Add new endpoints here so they show up in the generated spec. Routes kept
/// outside (like `/` or `OPTIONS /health`) are intentionally not documented.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::login::login,
        auth::login::logout,
        quiz::questions::list_questions,
        quiz::questions::list_all_questions,
        quiz::questions::create_question,
        quiz::questions::delete_question,
        quiz::participants::submit_participant,
        quiz::participants::list_participants,
        quiz::participants::get_participant,
        quiz::participants::delete_participant,
    ),
    components(schemas(
        health::Health,
        auth::types::LoginRequest,
        quiz::types::QuestionOption,
        quiz::types::QuestionResponse,
        quiz::types::CreateQuestionRequest,
        quiz::types::ParticipantResponse,
        quiz::types::CreateParticipantRequest,
        OkResponse,
        ErrorResponse,
    ))
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();

    // Use Cargo.toml metadata instead of the derive defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = cargo_license();

    spec.info = info;

    let mut quiz_tag = Tag::new("quiz");
    quiz_tag.description = Some("Public quiz questions and submissions".to_string());

    let mut admin_tag = Tag::new("admin");
    admin_tag.description = Some("Session-gated dashboard API".to_string());

    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Service health".to_string());

    spec.tags = Some(vec![quiz_tag, admin_tag, health_tag]);

    spec
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    if let Some(start) = author.find('<') {
        let name = author[..start].trim();
        let email = author[start + 1..].trim_end_matches('>').trim();
        let name = if name.is_empty() { None } else { Some(name) };
        let email = if email.is_empty() { None } else { Some(email) };
        (name, email)
    } else {
        let name = author.trim();
        (if name.is_empty() { None } else { Some(name) }, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let spec = openapi();
        assert_eq!(spec.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            spec.info.description.as_deref(),
            Some(env!("CARGO_PKG_DESCRIPTION"))
        );

        let contact = spec.info.contact;
        assert!(contact.is_some());
        if let Some(contact) = contact {
            assert_eq!(contact.name.as_deref(), Some("Team Sondeo"));
            assert_eq!(contact.email.as_deref(), Some("team@sondeo.dev"));
        }

        let license = spec.info.license;
        assert!(license.is_some());
        if let Some(license) = license {
            assert_eq!(license.name, "BSD-3-Clause");
            assert_eq!(license.identifier.as_deref(), Some("BSD-3-Clause"));
        }
    }

    #[test]
    fn openapi_tags_and_paths() {
        let spec = openapi();
        let tags = spec.tags.clone().unwrap_or_default();
        assert!(tags.iter().any(|tag| tag.name == "quiz"));
        assert!(tags.iter().any(|tag| tag.name == "admin"));
        assert!(spec.paths.paths.contains_key("/api/admin/login"));
        assert!(spec.paths.paths.contains_key("/api/questions"));
        assert!(
            spec.paths
                .paths
                .contains_key("/api/admin/participants/{id}")
        );
    }

    #[test]
    fn parse_author_variants() {
        assert_eq!(
            parse_author("Team Sondeo <team@sondeo.dev>"),
            (Some("Team Sondeo"), Some("team@sondeo.dev"))
        );
        assert_eq!(parse_author("Team Sondeo"), (Some("Team Sondeo"), None));
        assert_eq!(parse_author("<team@sondeo.dev>"), (None, Some("team@sondeo.dev")));
        assert_eq!(parse_author(""), (None, None));
    }
}
