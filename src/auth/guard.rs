//! Route Guard for protected entry points.
//!
//! Every evaluation queries the session again; a guard never trusts a decision
//! made by an outer layer. Denial is terminal: the caller must emit the
//! redirect and nothing else.

use rand::Rng;
use std::time::Duration;
use tracing::warn;

use super::{
    decision::{Condition, Fallbacks, decide},
    query::SessionQuery,
    session::{RequestContext, Session},
};

pub const DEFAULT_DELAY_MIN_MS: u64 = 200;
pub const DEFAULT_DELAY_MAX_MS: u64 = 500;

/// Bounded random pause before redirecting an anonymous visitor, so that "no
/// session" does not answer measurably faster than "insufficient privilege".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedirectDelay {
    min: Duration,
    max: Duration,
}

impl RedirectDelay {
    /// Bounds are reordered if given backwards.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    #[must_use]
    pub fn from_millis(min: u64, max: u64) -> Self {
        Self::new(Duration::from_millis(min), Duration::from_millis(max))
    }

    #[must_use]
    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn min(&self) -> Duration {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Duration {
        self.max
    }

    #[must_use]
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }

    pub async fn wait(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RedirectDelay {
    fn default() -> Self {
        Self::from_millis(DEFAULT_DELAY_MIN_MS, DEFAULT_DELAY_MAX_MS)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Allowed(Session),
    Redirected(String),
}

impl GuardOutcome {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }
}

#[derive(Clone)]
pub struct RouteGuard {
    query: SessionQuery,
    fallbacks: Fallbacks,
    condition: Option<Condition>,
    delay: RedirectDelay,
}

impl RouteGuard {
    #[must_use]
    pub fn new(query: SessionQuery) -> Self {
        Self {
            query,
            fallbacks: Fallbacks::default(),
            condition: None,
            delay: RedirectDelay::default(),
        }
    }

    #[must_use]
    pub fn with_fallbacks(mut self, fallbacks: Fallbacks) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    /// Override where anonymous visitors are sent.
    #[must_use]
    pub fn with_redirect_to(mut self, redirect_to: impl Into<String>) -> Self {
        self.fallbacks.unauthenticated = redirect_to.into();
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: RedirectDelay) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn fallbacks(&self) -> &Fallbacks {
        &self.fallbacks
    }

    pub async fn evaluate(&self, context: &RequestContext) -> GuardOutcome {
        let session = self.query.get_session(context).await;
        let decision = decide(session.as_ref(), self.condition, &self.fallbacks);

        match (decision.allow, session) {
            (true, Some(session)) => GuardOutcome::Allowed(session),
            (_, session) => {
                let redirect_to = decision
                    .redirect_to
                    .unwrap_or_else(|| self.fallbacks.unauthenticated.clone());
                if let Some(session) = session {
                    warn!(
                        "Unauthorized access attempt by user {}, redirecting to {}",
                        session.user_id, redirect_to
                    );
                } else {
                    warn!("Unauthenticated access attempt, redirecting to {}", redirect_to);
                    self.delay.wait().await;
                }
                GuardOutcome::Redirected(redirect_to)
            }
        }
    }
}
