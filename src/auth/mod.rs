//! Session gating.
//!
//! Flow Overview: an inbound request's identity headers become a
//! `RequestContext`; `SessionQuery` asks the Auth Service for the session
//! (failing closed); `decide` turns presence plus an optional condition into an
//! `AccessDecision`; `RouteGuard` and `AuthRedirect` apply that decision to
//! protected and public-only pages respectively.
//!
//! Security boundaries: nothing here caches a session, and every guard
//! re-checks on its own. Cookie and password material must never be logged.

pub mod decision;
pub mod guard;
pub mod http;
pub mod query;
pub mod redirect;
pub mod service;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use decision::{AccessDecision, Condition, Fallbacks, decide};
pub use guard::{GuardOutcome, RedirectDelay, RouteGuard};
pub use http::{HttpAuthService, HttpAuthServiceConfig};
pub use query::SessionQuery;
pub use redirect::{AuthRedirect, RedirectOutcome};
pub use service::{AuthError, AuthService, PasswordCredentials, SignInGrant};
pub use session::{RequestContext, Role, Session};
