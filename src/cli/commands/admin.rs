use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_ADMIN_USERNAME: &str = "admin-username";
pub const ARG_ADMIN_PASSWORD: &str = "admin-password";
pub const ARG_BASE_URL: &str = "base-url";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";

pub fn with_args(command: Command) -> Command {
    let command = with_session_args(command);
    with_credential_args(command)
}

fn with_session_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long(ARG_SESSION_SECRET)
                .help("Secret used to sign admin session tokens")
                .long_help(
                    "Secret used to sign admin session tokens. There is no fallback value, \
                     the server refuses to start without one.",
                )
                .env("SONDEO_SESSION_SECRET")
                .required(true),
        )
        .arg(
            Arg::new(ARG_BASE_URL)
                .long(ARG_BASE_URL)
                .help("Public base URL, drives the CORS origin and the cookie Secure flag")
                .env("SONDEO_BASE_URL")
                .default_value("http://localhost:8080"),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Admin session TTL in seconds")
                .env("SONDEO_SESSION_TTL_SECONDS")
                .default_value("28800")
                .value_parser(clap::value_parser!(i64)),
        )
}

fn with_credential_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ADMIN_USERNAME)
                .long(ARG_ADMIN_USERNAME)
                .help("Admin username for the dashboard login")
                .env("SONDEO_ADMIN_USERNAME"),
        )
        .arg(
            Arg::new(ARG_ADMIN_PASSWORD)
                .long(ARG_ADMIN_PASSWORD)
                .help("Admin password for the dashboard login")
                .env("SONDEO_ADMIN_PASSWORD"),
        )
}

/// Parsed admin arguments, credentials left empty when not configured.
pub struct Options {
    pub secret: String,
    pub username: String,
    pub password: String,
    pub base_url: String,
    pub session_ttl_seconds: i64,
}

impl Options {
    /// Extract admin options from CLI matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let secret = matches
            .get_one::<String>(ARG_SESSION_SECRET)
            .cloned()
            .context("missing required argument: --session-secret")?;

        let username = matches
            .get_one::<String>(ARG_ADMIN_USERNAME)
            .cloned()
            .unwrap_or_default();

        let password = matches
            .get_one::<String>(ARG_ADMIN_PASSWORD)
            .cloned()
            .unwrap_or_default();

        let base_url = matches
            .get_one::<String>(ARG_BASE_URL)
            .cloned()
            .unwrap_or_else(|| "http://localhost:8080".to_string());

        let session_ttl_seconds = matches
            .get_one::<i64>(ARG_SESSION_TTL_SECONDS)
            .copied()
            .unwrap_or(28_800);

        Ok(Self {
            secret,
            username,
            password,
            base_url,
            session_ttl_seconds,
        })
    }
}
