//! Auth Service collaborator surface.
//!
//! Everything cryptographic (password hashing, OAuth exchange, WebAuthn
//! ceremonies) happens behind this trait. Each entry point returns an explicit
//! `Result`; callers branch on it instead of registering callbacks.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use thiserror::Error;

use super::session::{RequestContext, Session};

/// Failure reported by, or while talking to, the Auth Service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The service answered and rejected the operation.
    #[error("auth service rejected the request: {}", .message.as_deref().unwrap_or("no message"))]
    Service { message: Option<String> },
    /// The call never produced a usable answer (network, timeout, decoding).
    #[error("auth service transport error: {0}")]
    Transport(String),
}

impl AuthError {
    #[must_use]
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: Some(message.into()),
        }
    }

    /// Human readable message supplied by the service, if any.
    ///
    /// Transport errors never carry one: their detail is for operators only.
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Service { message } => message.as_deref().filter(|m| !m.trim().is_empty()),
            Self::Transport(_) => None,
        }
    }
}

/// Successful sign-in as reported by the service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignInGrant {
    /// External destination the client must visit to continue (OAuth
    /// authorization page). `None` means the session already exists.
    pub redirect_url: Option<String>,
}

impl SignInGrant {
    #[must_use]
    pub fn completed() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn redirect(url: impl Into<String>) -> Self {
        Self {
            redirect_url: Some(url.into()),
        }
    }
}

/// Email and password pair submitted by the sign-in form.
#[derive(Clone)]
pub struct PasswordCredentials {
    pub email: String,
    pub password: SecretString,
    pub remember_me: bool,
}

impl PasswordCredentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
            remember_me: false,
        }
    }

    #[must_use]
    pub fn with_remember_me(mut self, remember_me: bool) -> Self {
        self.remember_me = remember_me;
        self
    }

    /// Both fields must be non-empty before anything is sent.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.expose_secret().is_empty()
    }
}

impl fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

/// Entry points of the external Auth Service.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Read the session bound to the forwarded identity context.
    async fn get_session(&self, context: &RequestContext) -> Result<Option<Session>, AuthError>;

    async fn sign_in_with_password(
        &self,
        credentials: &PasswordCredentials,
    ) -> Result<SignInGrant, AuthError>;

    async fn sign_in_with_passkey(&self) -> Result<SignInGrant, AuthError>;

    async fn sign_in_with_provider(&self, provider: &str) -> Result<SignInGrant, AuthError>;

    /// Terminate the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
