//! Wire types for the admin login endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Credentials submitted to `/api/admin/login`. Missing fields deserialize
/// to empty strings and fail the credential check instead of the parse.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_round_trip() -> Result<(), serde_json::Error> {
        let request = LoginRequest {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };

        let json = serde_json::to_string(&request)?;
        let parsed: LoginRequest = serde_json::from_str(&json)?;

        assert_eq!(parsed.username, "admin");
        assert_eq!(parsed.password, "hunter2");

        Ok(())
    }

    #[test]
    fn test_login_request_defaults_missing_fields() -> Result<(), serde_json::Error> {
        let parsed: LoginRequest = serde_json::from_str(r#"{"username":"admin"}"#)?;

        assert_eq!(parsed.username, "admin");
        assert_eq!(parsed.password, "");

        let parsed: LoginRequest = serde_json::from_str("{}")?;

        assert_eq!(parsed.username, "");
        assert_eq!(parsed.password, "");

        Ok(())
    }
}
