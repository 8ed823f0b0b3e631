use anyhow::{Result, anyhow, bail};
use secrecy::{ExposeSecret, SecretString};
use std::{sync::Arc, time::Duration};

use crate::{
    auth::{HttpAuthService, HttpAuthServiceConfig},
    cli::commands::{auth_service, client::SignInOptions},
    client::{
        AttemptMethod, AttemptOutcome, MemoryNavigator, Navigator, SignInOrchestrator,
        TracingNotifier,
    },
};

#[derive(Debug)]
pub struct Args {
    pub auth_service: auth_service::Options,
    pub options: SignInOptions,
}

/// Execute the sign-in action.
///
/// Prints where the client was sent and, on a second line, the `Cookie`
/// header of the issued session (input for `sign-out --cookie`).
/// # Errors
/// Returns an error if the attempt is invalid, refused or rejected.
pub async fn execute(args: Args) -> Result<()> {
    println!("{}", sign_in(args).await?);
    Ok(())
}

async fn sign_in(args: Args) -> Result<String> {
    let Args {
        auth_service,
        options,
    } = args;

    let config = HttpAuthServiceConfig::new(&auth_service.url)?
        .with_callback_url(options.landing.clone())
        .with_timeout(Duration::from_secs(auth_service.timeout_seconds));
    let service = Arc::new(HttpAuthService::new(config)?);
    let navigator = Arc::new(MemoryNavigator::new());

    let orchestrator = SignInOrchestrator::new(
        service.clone(),
        Arc::new(TracingNotifier),
        navigator.clone(),
        [options.method.clone()],
    )
    .with_landing(options.landing.clone());

    let outcome = run(&orchestrator, options).await;
    report(outcome, navigator.as_ref(), service.take_session_cookie())
}

async fn run(orchestrator: &SignInOrchestrator, options: SignInOptions) -> AttemptOutcome {
    match options.method {
        AttemptMethod::Email => {
            let email = options.email.unwrap_or_default();
            orchestrator
                .sign_in_with_email(&email, options.password, options.remember_me)
                .await
        }
        AttemptMethod::Passkey => orchestrator.sign_in_with_passkey().await,
        AttemptMethod::Provider(name) => orchestrator.sign_in_with_provider(&name).await,
    }
}

fn report(
    outcome: AttemptOutcome,
    navigator: &MemoryNavigator,
    cookie: Option<SecretString>,
) -> Result<String> {
    match outcome {
        AttemptOutcome::SignedIn { destination } => {
            let visited = navigator.destination().unwrap_or(destination);
            Ok(match cookie {
                Some(cookie) => format!("{visited}\n{}", cookie.expose_secret()),
                None => visited,
            })
        }
        AttemptOutcome::Failed { message } => bail!(message),
        AttemptOutcome::Invalid(err) => Err(anyhow!(err)),
        AttemptOutcome::Refused => bail!("another sign-in attempt is in flight"),
    }
}
