use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use secrecy::SecretString;

use crate::auth::decision::DEFAULT_DASHBOARD_PATH;
use crate::client::AttemptMethod;

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_REMEMBER_ME: &str = "remember-me";
pub const ARG_PASSKEY: &str = "passkey";
pub const ARG_PROVIDER: &str = "provider";
pub const ARG_LANDING: &str = "landing";
pub const ARG_COOKIE: &str = "cookie";
pub const ENV_SESSION_COOKIE: &str = "PORTICO_SESSION_COOKIE";

#[must_use]
pub fn sign_in_command() -> Command {
    Command::new("sign-in")
        .about("Sign in against the Auth Service")
        .arg(
            Arg::new(ARG_EMAIL)
                .short('e')
                .long(ARG_EMAIL)
                .help("Email address for password sign-in"),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long(ARG_PASSWORD)
                .help("Password for email sign-in")
                .env("PORTICO_PASSWORD")
                .hide_env_values(true)
                .requires(ARG_EMAIL),
        )
        .arg(
            Arg::new(ARG_REMEMBER_ME)
                .long(ARG_REMEMBER_ME)
                .help("Ask for a long-lived session")
                .action(ArgAction::SetTrue)
                .requires(ARG_EMAIL),
        )
        .arg(
            Arg::new(ARG_PASSKEY)
                .long(ARG_PASSKEY)
                .help("Sign in with a passkey")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_PROVIDER)
                .long(ARG_PROVIDER)
                .help("Sign in with an OAuth provider, example: google")
                .value_parser(super::gates::validator_provider()),
        )
        .arg(
            Arg::new(ARG_LANDING)
                .long(ARG_LANDING)
                .help("Destination after a completed sign-in")
                .env("PORTICO_DASHBOARD_PATH")
                .default_value(DEFAULT_DASHBOARD_PATH)
                .value_parser(super::gates::validator_path()),
        )
        .group(
            ArgGroup::new("method")
                .args([ARG_EMAIL, ARG_PASSKEY, ARG_PROVIDER])
                .required(true),
        )
}

#[must_use]
pub fn sign_out_command() -> Command {
    Command::new("sign-out")
        .about("End the session identified by a cookie")
        .arg(
            Arg::new(ARG_COOKIE)
                .short('c')
                .long(ARG_COOKIE)
                .help("Cookie header of the session to end")
                .env(ENV_SESSION_COOKIE)
                .hide_env_values(true)
                .required(true),
        )
}

/// Sign-in request built from the `sign-in` subcommand.
#[derive(Debug)]
pub struct SignInOptions {
    pub method: AttemptMethod,
    pub email: Option<String>,
    pub password: SecretString,
    pub remember_me: bool,
    pub landing: String,
}

impl SignInOptions {
    /// # Errors
    /// Returns an error if no sign-in method was selected.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let email = matches.get_one::<String>(ARG_EMAIL).cloned();
        let method = if email.is_some() {
            AttemptMethod::Email
        } else if matches.get_flag(ARG_PASSKEY) {
            AttemptMethod::Passkey
        } else if let Some(provider) = matches.get_one::<String>(ARG_PROVIDER) {
            AttemptMethod::provider(provider)
        } else {
            bail!("one of --{ARG_EMAIL}, --{ARG_PASSKEY} or --{ARG_PROVIDER} is required");
        };

        Ok(Self {
            method,
            email,
            password: SecretString::from(
                matches
                    .get_one::<String>(ARG_PASSWORD)
                    .cloned()
                    .unwrap_or_default(),
            ),
            remember_me: matches.get_flag(ARG_REMEMBER_ME),
            landing: matches
                .get_one::<String>(ARG_LANDING)
                .cloned()
                .unwrap_or_else(|| DEFAULT_DASHBOARD_PATH.to_string()),
        })
    }
}

#[derive(Debug)]
pub struct SignOutOptions {
    pub cookie: SecretString,
}

impl SignOutOptions {
    /// # Errors
    /// Returns an error if the cookie is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let cookie = matches
            .get_one::<String>(ARG_COOKIE)
            .cloned()
            .context("missing required argument: --cookie")?;
        Ok(Self {
            cookie: SecretString::from(cookie),
        })
    }
}
