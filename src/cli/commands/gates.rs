use anyhow::{Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command, builder::ValueParser};
use regex::Regex;

use crate::auth::{
    RedirectDelay,
    decision::{DEFAULT_DASHBOARD_PATH, DEFAULT_SIGN_IN_PATH},
    guard::{DEFAULT_DELAY_MAX_MS, DEFAULT_DELAY_MIN_MS},
};

pub const ARG_SIGN_IN_PATH: &str = "sign-in-path";
pub const ARG_DASHBOARD_PATH: &str = "dashboard-path";
pub const ARG_DENIED_PATH: &str = "denied-path";
pub const ARG_DELAY_MIN_MS: &str = "redirect-delay-min-ms";
pub const ARG_DELAY_MAX_MS: &str = "redirect-delay-max-ms";
pub const ARG_PROVIDERS: &str = "providers";
pub const ARG_NO_PASSKEY: &str = "no-passkey";

/// Redirect targets must be same-site absolute paths.
#[must_use]
pub fn validator_path() -> ValueParser {
    ValueParser::from(move |path: &str| -> std::result::Result<String, String> {
        if path.starts_with('/') && !path.starts_with("//") {
            Ok(path.to_string())
        } else {
            Err(format!("path must start with a single '/': {path}"))
        }
    })
}

#[must_use]
pub fn validator_provider() -> ValueParser {
    ValueParser::from(move |provider: &str| -> std::result::Result<String, String> {
        let provider = provider.trim().to_ascii_lowercase();
        let re = Regex::new(r"^[a-z0-9][a-z0-9_-]*$").map_err(|err| err.to_string())?;
        if re.is_match(&provider) {
            Ok(provider)
        } else {
            Err(format!("invalid provider name: {provider}"))
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SIGN_IN_PATH)
                .long(ARG_SIGN_IN_PATH)
                .help("Where anonymous visitors of protected pages are sent")
                .env("PORTICO_SIGN_IN_PATH")
                .default_value(DEFAULT_SIGN_IN_PATH)
                .value_parser(validator_path()),
        )
        .arg(
            Arg::new(ARG_DASHBOARD_PATH)
                .long(ARG_DASHBOARD_PATH)
                .help("Where signed-in visitors of public-only pages are sent")
                .env("PORTICO_DASHBOARD_PATH")
                .default_value(DEFAULT_DASHBOARD_PATH)
                .value_parser(validator_path()),
        )
        .arg(
            Arg::new(ARG_DENIED_PATH)
                .long(ARG_DENIED_PATH)
                .help("Where signed-in visitors lacking privilege are sent")
                .env("PORTICO_DENIED_PATH")
                .default_value(DEFAULT_DASHBOARD_PATH)
                .value_parser(validator_path()),
        )
        .arg(
            Arg::new(ARG_DELAY_MIN_MS)
                .long(ARG_DELAY_MIN_MS)
                .help("Lower bound of the pause before redirecting anonymous visitors")
                .env("PORTICO_REDIRECT_DELAY_MIN_MS")
                .default_value("200")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_DELAY_MAX_MS)
                .long(ARG_DELAY_MAX_MS)
                .help("Upper bound of the pause before redirecting anonymous visitors")
                .env("PORTICO_REDIRECT_DELAY_MAX_MS")
                .default_value("500")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_PROVIDERS)
                .long(ARG_PROVIDERS)
                .help("Comma separated OAuth providers offered on the sign-in page")
                .env("PORTICO_PROVIDERS")
                .value_delimiter(',')
                .default_value("google,github")
                .value_parser(validator_provider()),
        )
        .arg(
            Arg::new(ARG_NO_PASSKEY)
                .long(ARG_NO_PASSKEY)
                .help("Do not offer passkey sign-in")
                .env("PORTICO_NO_PASSKEY")
                .action(ArgAction::SetTrue),
        )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub sign_in_path: String,
    pub dashboard_path: String,
    pub denied_path: String,
    pub delay: RedirectDelay,
    pub providers: Vec<String>,
    pub passkey: bool,
}

impl Options {
    /// # Errors
    /// Returns an error if the delay bounds are inverted.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let path = |id: &str, default: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };
        let min = matches
            .get_one::<u64>(ARG_DELAY_MIN_MS)
            .copied()
            .unwrap_or(DEFAULT_DELAY_MIN_MS);
        let max = matches
            .get_one::<u64>(ARG_DELAY_MAX_MS)
            .copied()
            .unwrap_or(DEFAULT_DELAY_MAX_MS);
        if min > max {
            bail!("--{ARG_DELAY_MIN_MS} ({min}) must not exceed --{ARG_DELAY_MAX_MS} ({max})");
        }

        Ok(Self {
            sign_in_path: path(ARG_SIGN_IN_PATH, DEFAULT_SIGN_IN_PATH),
            dashboard_path: path(ARG_DASHBOARD_PATH, DEFAULT_DASHBOARD_PATH),
            denied_path: path(ARG_DENIED_PATH, DEFAULT_DASHBOARD_PATH),
            delay: RedirectDelay::from_millis(min, max),
            providers: matches
                .get_many::<String>(ARG_PROVIDERS)
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            passkey: !matches.get_flag(ARG_NO_PASSKEY),
        })
    }
}
