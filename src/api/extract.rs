//! Page-level session extractors.
//!
//! Each extractor asks the Auth Service again, even behind `require_session`.
//! A rejection is the redirect response itself, so the handler body never
//! runs and no page content is produced.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::error;

use super::state::Gate;
use crate::auth::{GuardOutcome, RedirectOutcome, RequestContext, Session};

/// Session of a visitor allowed onto a protected page.
#[derive(Clone, Debug)]
pub struct Protected(pub Session);

/// Marker for a public-only page: the visitor has no session.
#[derive(Clone, Copy, Debug)]
pub struct PublicOnly;

fn gate(parts: &Parts) -> Result<Arc<Gate>, Response> {
    parts.extensions.get::<Arc<Gate>>().cloned().ok_or_else(|| {
        error!("Gate extension missing from request");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

impl<S> FromRequestParts<S> for Protected
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let gate = gate(parts)?;
        let context = RequestContext::from_headers(&parts.headers);
        match gate.guard(None).evaluate(&context).await {
            GuardOutcome::Allowed(session) => Ok(Self(session)),
            GuardOutcome::Redirected(to) => Err(Redirect::temporary(&to).into_response()),
        }
    }
}

impl<S> FromRequestParts<S> for PublicOnly
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let gate = gate(parts)?;
        let context = RequestContext::from_headers(&parts.headers);
        match gate.redirect().evaluate(&context).await {
            RedirectOutcome::Public => Ok(Self),
            RedirectOutcome::Redirected(to) => Err(Redirect::temporary(&to).into_response()),
        }
    }
}
