use crate::cli::{
    actions::{Action, server, sign_in, sign_out},
    telemetry,
};
use anyhow::Result;

/// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    let result = match action {
        Action::Server(args) => server::execute(args).await,
        Action::SignIn(args) => sign_in::execute(args).await,
        Action::SignOut(args) => sign_out::execute(args).await,
    };

    telemetry::shutdown_tracer();

    result
}
