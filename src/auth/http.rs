//! `reqwest` implementation of the Auth Service against a Better Auth style
//! REST API (`/get-session`, `/sign-in/*`, `/sign-out`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    Client, Response, StatusCode,
    header::{HeaderMap, SET_COOKIE},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};
use tracing::{debug, error, instrument};
use url::Url;

use super::{
    service::{AuthError, AuthService, PasswordCredentials, SignInGrant},
    session::{RequestContext, Role, Session},
};
use crate::APP_USER_AGENT;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_CALLBACK_PATH: &str = "/dashboard";

#[derive(Clone, Debug)]
pub struct HttpAuthServiceConfig {
    base_url: Url,
    callback_url: String,
    timeout: Duration,
}

impl HttpAuthServiceConfig {
    /// # Errors
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid auth service URL: {base_url}"))?;
        // `Url::join` replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            callback_url: DEFAULT_CALLBACK_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        })
    }

    #[must_use]
    pub fn with_callback_url(mut self, callback_url: String) -> Self {
        self.callback_url = callback_url;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }
}

pub struct HttpAuthService {
    client: Client,
    config: HttpAuthServiceConfig,
    context: RequestContext,
    issued_cookie: Mutex<Option<SecretString>>,
}

impl HttpAuthService {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: HttpAuthServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .context("Failed to build auth service HTTP client")?;

        Ok(Self {
            client,
            config,
            context: RequestContext::anonymous(),
            issued_cookie: Mutex::new(None),
        })
    }

    /// Cookie header value for the session issued by the last sign-in, if the
    /// service set one. Taking it clears it.
    #[must_use]
    pub fn take_session_cookie(&self) -> Option<SecretString> {
        self.issued_cookie
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Identity sent with the client-side calls (sign-in, sign-out).
    #[must_use]
    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn config(&self) -> &HttpAuthServiceConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.config
            .base_url
            .join(path)
            .map_err(|err| AuthError::Transport(format!("invalid endpoint {path}: {err}")))
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Response, AuthError> {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .post(url.clone())
            .headers(self.context.headers().clone())
            .json(&body)
            .send()
            .await
            .map_err(|err| transport(&url, &err))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(service_error(response).await)
        }
    }

    async fn sign_in(&self, path: &str, body: serde_json::Value) -> Result<SignInGrant, AuthError> {
        let response = self.post(path, body).await?;
        if let Some(cookie) = issued_cookies(response.headers()) {
            debug!("Auth service issued a session cookie");
            *self
                .issued_cookie
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(SecretString::from(cookie));
        }
        // Bodies are optional; an empty or foreign body still means success.
        let grant = response
            .json::<SignInBody>()
            .await
            .ok()
            .and_then(|body| body.url.filter(|_| body.redirect.unwrap_or(true)))
            .map_or_else(SignInGrant::completed, SignInGrant::redirect);
        Ok(grant)
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    #[instrument(skip(self))]
    async fn get_session(&self, context: &RequestContext) -> Result<Option<Session>, AuthError> {
        let url = self.endpoint("get-session")?;
        let response = self
            .client
            .get(url.clone())
            .headers(context.headers().clone())
            .send()
            .await
            .map_err(|err| transport(&url, &err))?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::UNAUTHORIZED => return Ok(None),
            status if !status.is_success() => return Err(service_error(response).await),
            _ => {}
        }

        let envelope: Option<SessionEnvelope> = response
            .json()
            .await
            .map_err(|err| AuthError::Transport(format!("invalid session body: {err}")))?;

        Ok(envelope.map(Session::from))
    }

    #[instrument(skip(self, credentials))]
    async fn sign_in_with_password(
        &self,
        credentials: &PasswordCredentials,
    ) -> Result<SignInGrant, AuthError> {
        self.sign_in(
            "sign-in/email",
            json!({
                "email": credentials.email,
                "password": credentials.password.expose_secret(),
                "rememberMe": credentials.remember_me,
                "callbackURL": self.config.callback_url,
            }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn sign_in_with_passkey(&self) -> Result<SignInGrant, AuthError> {
        self.sign_in("sign-in/passkey", json!({})).await
    }

    #[instrument(skip(self))]
    async fn sign_in_with_provider(&self, provider: &str) -> Result<SignInGrant, AuthError> {
        self.sign_in(
            "sign-in/social",
            json!({
                "provider": provider,
                "callbackURL": self.config.callback_url,
            }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), AuthError> {
        self.post("sign-out", json!({})).await?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct SessionEnvelope {
    user: WireUser,
}

#[derive(Deserialize)]
struct WireUser {
    id: String,
    #[serde(default)]
    name: Option<String>,
    email: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl From<SessionEnvelope> for Session {
    fn from(envelope: SessionEnvelope) -> Self {
        let user = envelope.user;
        Self {
            user_id: user.id,
            display_name: user.name.unwrap_or_default(),
            email: user.email,
            avatar_url: user.image.filter(|image| !image.is_empty()),
            role: user.role.as_deref().and_then(Role::parse),
        }
    }
}

#[derive(Deserialize)]
struct SignInBody {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    redirect: Option<bool>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// `name=value` of every cookie in `Set-Cookie`, joined as a `Cookie` header.
/// Cleared cookies (empty value) are left out.
fn issued_cookies(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| {
            pair.split_once('=')
                .is_some_and(|(name, value)| !name.trim().is_empty() && !value.is_empty())
        })
        .collect();
    (!pairs.is_empty()).then(|| pairs.join("; "))
}

fn transport(url: &Url, err: &reqwest::Error) -> AuthError {
    error!("Auth service request to {} failed: {}", url, err);
    AuthError::Transport(err.to_string())
}

async fn service_error(response: Response) -> AuthError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message);
    debug!("Auth service answered {}: {:?}", status, message);

    // 5xx means the service could not decide; treat it like an outage.
    if status.is_server_error() {
        return AuthError::Transport(format!(
            "auth service returned {status}: {}",
            message.as_deref().unwrap_or("")
        ));
    }
    AuthError::Service { message }
}
