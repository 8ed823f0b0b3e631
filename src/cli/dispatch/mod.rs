//! Map validated CLI matches to an action.

use anyhow::{Result, bail};

use crate::cli::actions::{Action, server, sign_in, sign_out};
use crate::cli::commands::{ARG_PORT, auth_service, client, gates};

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("server", sub_m)) => {
            let port = sub_m.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
            Ok(Action::Server(server::Args {
                port,
                auth_service: auth_service::Options::parse(sub_m)?,
                gates: gates::Options::parse(sub_m)?,
            }))
        }
        Some(("sign-in", sub_m)) => Ok(Action::SignIn(sign_in::Args {
            auth_service: auth_service::Options::parse(sub_m)?,
            options: client::SignInOptions::parse(sub_m)?,
        })),
        Some(("sign-out", sub_m)) => Ok(Action::SignOut(sign_out::Args {
            auth_service: auth_service::Options::parse(sub_m)?,
            options: client::SignOutOptions::parse(sub_m)?,
        })),
        Some((other, _)) => bail!("unknown subcommand: {other}"),
        None => bail!("a subcommand is required"),
    }
}
