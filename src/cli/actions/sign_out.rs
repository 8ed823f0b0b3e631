use anyhow::{Result, bail};
use secrecy::ExposeSecret;
use std::{sync::Arc, time::Duration};

use crate::{
    auth::{HttpAuthService, HttpAuthServiceConfig, RequestContext},
    cli::commands::{auth_service, client::SignOutOptions},
    client::{MemoryNavigator, SignOutAction, SignOutOutcome, TracingNotifier},
};

#[derive(Debug)]
pub struct Args {
    pub auth_service: auth_service::Options,
    pub options: SignOutOptions,
}

/// Execute the sign-out action for the session carried by the cookie.
/// # Errors
/// Returns an error if the cookie is malformed or the Auth Service refuses.
pub async fn execute(args: Args) -> Result<()> {
    let context = RequestContext::from_cookie(args.options.cookie.expose_secret())?;
    let config = HttpAuthServiceConfig::new(&args.auth_service.url)?
        .with_timeout(Duration::from_secs(args.auth_service.timeout_seconds));
    let service = HttpAuthService::new(config)?.with_context(context);
    let navigator = Arc::new(MemoryNavigator::new());

    let action = SignOutAction::new(
        Arc::new(service),
        Arc::new(TracingNotifier),
        navigator.clone(),
    );

    match action.sign_out().await {
        SignOutOutcome::SignedOut => {
            println!("{}", navigator.destination().unwrap_or_default());
            Ok(())
        }
        SignOutOutcome::Failed { message } => bail!(message),
        SignOutOutcome::Refused => bail!("a sign-out is already in flight"),
    }
}
