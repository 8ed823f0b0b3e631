//! Session Query: one authoritative, uncached lookup per evaluation.

use std::sync::Arc;
use tracing::error;

use super::{
    service::AuthService,
    session::{RequestContext, Session},
};

#[derive(Clone)]
pub struct SessionQuery {
    service: Arc<dyn AuthService>,
}

impl SessionQuery {
    #[must_use]
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        Self { service }
    }

    #[must_use]
    pub fn service(&self) -> &Arc<dyn AuthService> {
        &self.service
    }

    /// Ask the Auth Service for the session bound to `context`.
    ///
    /// Fails closed: any error is reported as an absent session.
    pub async fn get_session(&self, context: &RequestContext) -> Option<Session> {
        match self.service.get_session(context).await {
            Ok(session) => session,
            Err(err) => {
                error!("Session query failed, treating visitor as anonymous: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{service::AuthError, test_support::StubAuthService};

    #[tokio::test]
    async fn transport_failure_is_absent() {
        let stub = StubAuthService::new();
        stub.fail_session_with(AuthError::Transport("connection refused".to_string()));
        let query = SessionQuery::new(Arc::new(stub));
        assert!(query.get_session(&RequestContext::anonymous()).await.is_none());
    }

    #[tokio::test]
    async fn every_call_reaches_the_service() {
        let stub = Arc::new(StubAuthService::new());
        stub.set_session(Some(Session::new("u1", "Ada", "a@b.com")));
        let query = SessionQuery::new(stub.clone());

        assert!(query.get_session(&RequestContext::anonymous()).await.is_some());
        stub.set_session(None);
        assert!(query.get_session(&RequestContext::anonymous()).await.is_none());
        assert_eq!(stub.session_calls(), 2);
    }
}
