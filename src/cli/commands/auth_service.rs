use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

pub const ARG_AUTH_SERVICE_URL: &str = "auth-service-url";
pub const ARG_AUTH_SERVICE_TIMEOUT: &str = "auth-service-timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_AUTH_SERVICE_URL)
                .short('a')
                .long(ARG_AUTH_SERVICE_URL)
                .help("Auth Service base URL, example: https://auth.tld/api/auth")
                .env("PORTICO_AUTH_SERVICE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_AUTH_SERVICE_TIMEOUT)
                .long(ARG_AUTH_SERVICE_TIMEOUT)
                .help("Timeout for each Auth Service call in seconds")
                .env("PORTICO_AUTH_SERVICE_TIMEOUT")
                .default_value("10")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub url: String,
    pub timeout_seconds: u64,
}

impl Options {
    /// # Errors
    /// Returns an error if the Auth Service URL is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let url = matches
            .get_one::<String>(ARG_AUTH_SERVICE_URL)
            .cloned()
            .context("missing required argument: --auth-service-url")?;
        let timeout_seconds = matches
            .get_one::<u64>(ARG_AUTH_SERVICE_TIMEOUT)
            .copied()
            .unwrap_or(10);

        Ok(Self {
            url,
            timeout_seconds,
        })
    }
}
