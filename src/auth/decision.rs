//! Access Decision: a pure function of session presence and an optional
//! condition.

use super::session::{Role, Session};

pub const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";
pub const DEFAULT_DASHBOARD_PATH: &str = "/dashboard";

/// Extra requirement a present session must satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Role(Role),
}

impl Condition {
    #[must_use]
    pub fn is_met_by(self, session: &Session) -> bool {
        match self {
            Self::Role(role) => session.has_role(role),
        }
    }
}

/// Redirect destinations for the two kinds of denial.
///
/// An anonymous visitor and a signed-in visitor lacking privilege are sent to
/// different places.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fallbacks {
    pub unauthenticated: String,
    pub denied: String,
}

impl Default for Fallbacks {
    fn default() -> Self {
        Self {
            unauthenticated: DEFAULT_SIGN_IN_PATH.to_string(),
            denied: DEFAULT_DASHBOARD_PATH.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessDecision {
    pub allow: bool,
    pub redirect_to: Option<String>,
}

impl AccessDecision {
    #[must_use]
    pub fn allow() -> Self {
        Self {
            allow: true,
            redirect_to: None,
        }
    }

    #[must_use]
    pub fn deny(redirect_to: impl Into<String>) -> Self {
        Self {
            allow: false,
            redirect_to: Some(redirect_to.into()),
        }
    }
}

#[must_use]
pub fn decide(
    session: Option<&Session>,
    condition: Option<Condition>,
    fallbacks: &Fallbacks,
) -> AccessDecision {
    let Some(session) = session else {
        return AccessDecision::deny(&fallbacks.unauthenticated);
    };

    match condition {
        Some(condition) if !condition.is_met_by(session) => AccessDecision::deny(&fallbacks.denied),
        _ => AccessDecision::allow(),
    }
}
