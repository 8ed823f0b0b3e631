//! Auth Redirect for public-only entry points (sign-in, sign-up).
//!
//! Inverse polarity of the route guard: an anonymous visitor sees the page, a
//! signed-in one is sent away before any of the page is produced.

use tracing::info;

use super::{
    decision::DEFAULT_DASHBOARD_PATH,
    query::SessionQuery,
    session::RequestContext,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// No session: render the public page.
    Public,
    /// Session present: skip the page and go here instead.
    Redirected(String),
}

#[derive(Clone)]
pub struct AuthRedirect {
    query: SessionQuery,
    redirect_to: String,
}

impl AuthRedirect {
    #[must_use]
    pub fn new(query: SessionQuery) -> Self {
        Self {
            query,
            redirect_to: DEFAULT_DASHBOARD_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn with_redirect_to(mut self, redirect_to: impl Into<String>) -> Self {
        self.redirect_to = redirect_to.into();
        self
    }

    pub async fn evaluate(&self, context: &RequestContext) -> RedirectOutcome {
        match self.query.get_session(context).await {
            Some(session) => {
                info!(
                    "Authenticated user {} redirected from public page to {}",
                    session.user_id, self.redirect_to
                );
                RedirectOutcome::Redirected(self.redirect_to.clone())
            }
            None => RedirectOutcome::Public,
        }
    }
}
