//! Session entity and the identity-bearing request context.
//!
//! A `Session` is only ever observed, never mutated: the Auth Service creates
//! and destroys it. Callers must re-query it for every evaluation because it
//! can disappear between two requests (sign-out in another tab, expiry).

use axum::http::{
    HeaderMap, HeaderValue,
    header::{AUTHORIZATION, COOKIE},
};
use serde::Serialize;
use std::fmt;

/// Roles recognized by role-gated guards.
///
/// Nothing assigns a default role; a session without one simply fails any role
/// condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Parse a role reported by the Auth Service. Unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated visitor as reported by the Auth Service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            email: email.into(),
            avatar_url: None,
            role: None,
        }
    }

    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Letter shown in place of a missing avatar.
    #[must_use]
    pub fn avatar_initial(&self) -> String {
        self.display_name
            .trim()
            .chars()
            .next()
            .map_or_else(|| "U".to_string(), |c| c.to_uppercase().collect())
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

/// Identity-bearing headers of an inbound request.
///
/// Only `Cookie` and `Authorization` are kept, byte for byte. Rebuilding them
/// (re-encoding cookies, dropping duplicates) would make the session lookup
/// anonymous.
#[derive(Clone, Default)]
pub struct RequestContext {
    headers: HeaderMap,
}

impl RequestContext {
    /// Context with no identity at all.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut forwarded = HeaderMap::new();
        for name in [COOKIE, AUTHORIZATION] {
            for value in headers.get_all(&name) {
                forwarded.append(name.clone(), value.clone());
            }
        }
        Self { headers: forwarded }
    }

    /// Context carrying a single raw `Cookie` header value.
    ///
    /// # Errors
    /// Returns an error if the value is not a valid header value.
    pub fn from_cookie(cookie: &str) -> Result<Self, axum::http::header::InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
        Ok(Self { headers })
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.headers.is_empty()
    }
}

// Cookies are credentials; never print them.
impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("cookie", &self.headers.contains_key(COOKIE))
            .field("authorization", &self.headers.contains_key(AUTHORIZATION))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::header::USER_AGENT;

    #[test]
    fn role_parse_accepts_known_roles_only() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse(" Admin "), Some(Role::Admin));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn avatar_initial_falls_back_to_u() {
        assert_eq!(Session::new("u1", "ada", "a@b.com").avatar_initial(), "A");
        assert_eq!(Session::new("u1", "  ", "a@b.com").avatar_initial(), "U");
    }

    #[test]
    fn request_context_keeps_identity_headers_verbatim() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1; session=abc"));
        headers.append(COOKIE, HeaderValue::from_static("b=2"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer t0k"));
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8"));

        let context = RequestContext::from_headers(&headers);
        let cookies: Vec<_> = context.headers().get_all(COOKIE).iter().collect();
        assert_eq!(cookies, vec!["a=1; session=abc", "b=2"]);
        assert_eq!(context.headers().get(AUTHORIZATION).unwrap(), "Bearer t0k");
        assert!(!context.headers().contains_key(USER_AGENT));
    }

    #[test]
    fn request_context_debug_redacts_values() {
        let context = RequestContext::from_cookie("session=secret").unwrap();
        let rendered = format!("{context:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("cookie: true"));
    }

    #[test]
    fn anonymous_context_is_empty() {
        assert!(RequestContext::anonymous().is_anonymous());
        assert!(RequestContext::from_headers(&HeaderMap::new()).is_anonymous());
    }
}
