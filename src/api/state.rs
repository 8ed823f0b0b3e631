//! Gate configuration shared by every request.
//!
//! Immutable after startup; handlers receive it as `Extension<Arc<Gate>>`.

use std::sync::Arc;

use crate::auth::{
    AuthRedirect, AuthService, Condition, Fallbacks, RedirectDelay, RouteGuard, SessionQuery,
    decision::DEFAULT_DASHBOARD_PATH,
};
use crate::client::AttemptMethod;

pub const DEFAULT_PROVIDERS: [&str; 2] = ["google", "github"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateConfig {
    fallbacks: Fallbacks,
    delay: RedirectDelay,
    authenticated_redirect: String,
    providers: Vec<String>,
    passkey: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            fallbacks: Fallbacks::default(),
            delay: RedirectDelay::default(),
            authenticated_redirect: DEFAULT_DASHBOARD_PATH.to_string(),
            providers: DEFAULT_PROVIDERS.iter().map(ToString::to_string).collect(),
            passkey: true,
        }
    }
}

impl GateConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fallbacks(mut self, fallbacks: Fallbacks) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: RedirectDelay) -> Self {
        self.delay = delay;
        self
    }

    /// Where public-only pages send visitors who are already signed in.
    #[must_use]
    pub fn with_authenticated_redirect(mut self, path: impl Into<String>) -> Self {
        self.authenticated_redirect = path.into();
        self
    }

    /// Provider names are trimmed and lower-cased; blanks and duplicates are dropped.
    #[must_use]
    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for provider in providers {
            let name = provider.as_ref().trim().to_ascii_lowercase();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        self.providers = names;
        self
    }

    #[must_use]
    pub fn with_passkey(mut self, enabled: bool) -> Self {
        self.passkey = enabled;
        self
    }

    #[must_use]
    pub fn fallbacks(&self) -> &Fallbacks {
        &self.fallbacks
    }

    #[must_use]
    pub fn delay(&self) -> RedirectDelay {
        self.delay
    }

    #[must_use]
    pub fn authenticated_redirect(&self) -> &str {
        &self.authenticated_redirect
    }

    #[must_use]
    pub fn providers(&self) -> &[String] {
        &self.providers
    }

    #[must_use]
    pub fn passkey(&self) -> bool {
        self.passkey
    }

    /// Supplementary sign-in methods in form order: passkey, then providers.
    #[must_use]
    pub fn methods(&self) -> Vec<AttemptMethod> {
        let passkey = self.passkey.then_some(AttemptMethod::Passkey);
        passkey
            .into_iter()
            .chain(self.providers.iter().map(AttemptMethod::provider))
            .collect()
    }
}

/// Per-process gate: configuration plus the session query.
#[derive(Clone)]
pub struct Gate {
    config: GateConfig,
    query: SessionQuery,
}

impl Gate {
    #[must_use]
    pub fn new(config: GateConfig, service: Arc<dyn AuthService>) -> Self {
        Self {
            config,
            query: SessionQuery::new(service),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    #[must_use]
    pub fn query(&self) -> &SessionQuery {
        &self.query
    }

    /// A fresh guard for one protected page.
    #[must_use]
    pub fn guard(&self, condition: Option<Condition>) -> RouteGuard {
        let guard = RouteGuard::new(self.query.clone())
            .with_fallbacks(self.config.fallbacks.clone())
            .with_delay(self.config.delay);
        match condition {
            Some(condition) => guard.with_condition(condition),
            None => guard,
        }
    }

    #[must_use]
    pub fn redirect(&self) -> AuthRedirect {
        AuthRedirect::new(self.query.clone())
            .with_redirect_to(self.config.authenticated_redirect.clone())
    }
}
