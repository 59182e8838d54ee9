use crate::api;
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub admin_username: String,
    pub admin_password: SecretString,
    pub session_secret: SecretString,
    pub base_url: String,
    pub session_ttl_seconds: i64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = api::AdminConfig::new(args.session_secret)
        .with_username(args.admin_username)
        .with_password(args.admin_password)
        .with_base_url(args.base_url)
        .with_session_ttl_seconds(args.session_ttl_seconds);

    api::new(args.port, args.dsn, config).await
}
