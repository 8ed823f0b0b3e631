use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::state::Gate;
use crate::auth::{GuardOutcome, RequestContext};

/// Layout-level guard for every route it is layered on.
///
/// The session is not forwarded to the handler; pages re-check on their own.
pub async fn require_session(
    Extension(gate): Extension<Arc<Gate>>,
    request: Request,
    next: Next,
) -> Response {
    let context = RequestContext::from_headers(request.headers());
    match gate.guard(None).evaluate(&context).await {
        GuardOutcome::Allowed(_) => next.run(request).await,
        GuardOutcome::Redirected(to) => Redirect::temporary(&to).into_response(),
    }
}
