use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tracing::info;

use crate::{
    api::{self, Gate, GateConfig},
    auth::{Fallbacks, HttpAuthService, HttpAuthServiceConfig},
    cli::commands::{auth_service, gates},
};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub auth_service: auth_service::Options,
    pub gates: gates::Options,
}

impl Args {
    #[must_use]
    pub fn gate_config(&self) -> GateConfig {
        GateConfig::new()
            .with_fallbacks(Fallbacks {
                unauthenticated: self.gates.sign_in_path.clone(),
                denied: self.gates.denied_path.clone(),
            })
            .with_authenticated_redirect(self.gates.dashboard_path.clone())
            .with_delay(self.gates.delay)
            .with_providers(&self.gates.providers)
            .with_passkey(self.gates.passkey)
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the Auth Service client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    // One shared client for every visitor.
    let service_config = HttpAuthServiceConfig::new(&args.auth_service.url)?
        .with_callback_url(args.gates.dashboard_path.clone())
        .with_timeout(Duration::from_secs(args.auth_service.timeout_seconds));
    let service = HttpAuthService::new(service_config)?;

    let gate = Arc::new(Gate::new(args.gate_config(), Arc::new(service)));

    api::new(args.port, gate).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("auth_service_url", args.auth_service.url.clone()),
        (
            "auth_service_timeout",
            format!("{}s", args.auth_service.timeout_seconds),
        ),
        ("sign_in_path", args.gates.sign_in_path.clone()),
        ("dashboard_path", args.gates.dashboard_path.clone()),
        ("denied_path", args.gates.denied_path.clone()),
        (
            "redirect_delay",
            format!(
                "{}..={}ms",
                args.gates.delay.min().as_millis(),
                args.gates.delay.max().as_millis()
            ),
        ),
        ("providers", args.gates.providers.join(",")),
        ("passkey", args.gates.passkey.to_string()),
    ];
    log_entries("Startup configuration", &entries);
}

fn log_entries(title: &str, entries: &[(&str, String)]) {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "portico {} - {}\n\n{title}:",
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}
