//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::admin;
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let admin_opts = admin::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        admin_username: admin_opts.username,
        admin_password: SecretString::from(admin_opts.password),
        session_secret: SecretString::from(admin_opts.secret),
        base_url: admin_opts.base_url,
        session_ttl_seconds: admin_opts.session_ttl_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn handler_builds_server_args() {
        temp_env::with_vars(
            [
                ("SONDEO_SESSION_SECRET", Some("env-secret")),
                ("SONDEO_ADMIN_USERNAME", Some("admin")),
                ("SONDEO_ADMIN_PASSWORD", Some("hunter2")),
                ("SONDEO_DSN", Some("postgres://localhost:5432/sondeo")),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["sondeo"]);
                let result = handler(&matches);

                assert!(result.is_ok());
                if let Ok(Action::Server(args)) = result {
                    assert_eq!(args.port, 8080);
                    assert_eq!(args.dsn, "postgres://localhost:5432/sondeo");
                    assert_eq!(args.admin_username, "admin");
                    assert_eq!(args.admin_password.expose_secret(), "hunter2");
                    assert_eq!(args.session_secret.expose_secret(), "env-secret");
                    assert_eq!(args.base_url, "http://localhost:8080");
                    assert_eq!(args.session_ttl_seconds, 28_800);
                }
            },
        );
    }
}
