//! In-memory Auth Service double for unit tests.

use async_trait::async_trait;
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::Notify;

use super::{
    service::{AuthError, AuthService, PasswordCredentials, SignInGrant},
    session::{RequestContext, Session},
};

pub(crate) struct StubAuthService {
    session: Mutex<Result<Option<Session>, AuthError>>,
    sign_in: Mutex<Result<SignInGrant, AuthError>>,
    sign_out: Mutex<Result<(), AuthError>>,
    calls: Mutex<Vec<String>>,
    session_calls: AtomicUsize,
    hold: Mutex<Option<Arc<Notify>>>,
    entered: Arc<Notify>,
}

impl StubAuthService {
    pub(crate) fn new() -> Self {
        Self {
            session: Mutex::new(Ok(None)),
            sign_in: Mutex::new(Ok(SignInGrant::completed())),
            sign_out: Mutex::new(Ok(())),
            calls: Mutex::new(Vec::new()),
            session_calls: AtomicUsize::new(0),
            hold: Mutex::new(None),
            entered: Arc::new(Notify::new()),
        }
    }

    pub(crate) fn set_session(&self, session: Option<Session>) {
        *lock(&self.session) = Ok(session);
    }

    pub(crate) fn fail_session_with(&self, err: AuthError) {
        *lock(&self.session) = Err(err);
    }

    pub(crate) fn set_sign_in(&self, result: Result<SignInGrant, AuthError>) {
        *lock(&self.sign_in) = result;
    }

    pub(crate) fn set_sign_out(&self, result: Result<(), AuthError>) {
        *lock(&self.sign_out) = result;
    }

    /// Park every sign-in/sign-out call until the returned handle is notified.
    pub(crate) fn hold_calls(&self) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        *lock(&self.hold) = Some(release.clone());
        release
    }

    /// Notified each time a sign-in/sign-out call starts.
    pub(crate) fn entered(&self) -> Arc<Notify> {
        self.entered.clone()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub(crate) fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    async fn record(&self, call: String) {
        lock(&self.calls).push(call);
        self.entered.notify_one();
        let hold = lock(&self.hold).clone();
        if let Some(release) = hold {
            release.notified().await;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl AuthService for StubAuthService {
    async fn get_session(&self, _context: &RequestContext) -> Result<Option<Session>, AuthError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.session).clone()
    }

    async fn sign_in_with_password(
        &self,
        credentials: &PasswordCredentials,
    ) -> Result<SignInGrant, AuthError> {
        self.record(format!("email:{}", credentials.email)).await;
        lock(&self.sign_in).clone()
    }

    async fn sign_in_with_passkey(&self) -> Result<SignInGrant, AuthError> {
        self.record("passkey".to_string()).await;
        lock(&self.sign_in).clone()
    }

    async fn sign_in_with_provider(&self, provider: &str) -> Result<SignInGrant, AuthError> {
        self.record(format!("provider:{provider}")).await;
        lock(&self.sign_in).clone()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.record("sign_out".to_string()).await;
        let result = lock(&self.sign_out).clone();
        if result.is_ok() {
            *lock(&self.session) = Ok(None);
        }
        result
    }
}
