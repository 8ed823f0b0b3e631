//! Sign-in orchestrator for one sign-in form.

use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::{
    attempt::{AcquireError, AttemptFlags, AttemptMethod, AuthAttemptState},
    notify::{LoadingNotice, Navigator, Notifier},
};
use crate::auth::{
    AuthError, AuthService, PasswordCredentials, SignInGrant, decision::DEFAULT_DASHBOARD_PATH,
};

/// Rejected locally, before anything reaches the Auth Service.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Sign-in provider {0} is not configured")]
    UnknownProvider(String),
    #[error("Passkey sign-in is not enabled")]
    PasskeyDisabled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The client was sent to `destination`.
    SignedIn { destination: String },
    /// The service refused or could not be reached; `message` was notified.
    Failed { message: String },
    Invalid(ValidationError),
    /// Another attempt was in flight; nothing happened.
    Refused,
}

impl AttemptOutcome {
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }
}

/// Drives email, passkey and provider sign-in, allowing one attempt at a time.
///
/// Cloning shares the busy state, so a clone handed to another task still
/// observes the same form.
#[derive(Clone)]
pub struct SignInOrchestrator {
    service: Arc<dyn AuthService>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    flags: AttemptFlags,
    landing: String,
}

impl SignInOrchestrator {
    /// `methods` lists the supplementary methods; email is always offered.
    #[must_use]
    pub fn new(
        service: Arc<dyn AuthService>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        methods: impl IntoIterator<Item = AttemptMethod>,
    ) -> Self {
        Self {
            service,
            notifier,
            navigator,
            flags: AttemptFlags::new(AuthAttemptState::new(methods)),
            landing: DEFAULT_DASHBOARD_PATH.to_string(),
        }
    }

    /// Where a completed sign-in lands.
    #[must_use]
    pub fn with_landing(mut self, landing: impl Into<String>) -> Self {
        self.landing = landing.into();
        self
    }

    #[must_use]
    pub fn landing(&self) -> &str {
        &self.landing
    }

    #[must_use]
    pub fn state(&self) -> AuthAttemptState {
        self.flags.snapshot()
    }

    /// True while any method is in flight; the form disables every control.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.flags.snapshot().any_busy()
    }

    #[must_use]
    pub fn is_method_busy(&self, method: &AttemptMethod) -> bool {
        self.flags.snapshot().is_busy(method)
    }

    pub async fn sign_in_with_email(
        &self,
        email: &str,
        password: SecretString,
        remember_me: bool,
    ) -> AttemptOutcome {
        let credentials =
            PasswordCredentials::new(email.trim(), password).with_remember_me(remember_me);
        if !credentials.is_complete() {
            return AttemptOutcome::Invalid(ValidationError::MissingCredentials);
        }

        self.attempt(AttemptMethod::Email, || {
            self.service.sign_in_with_password(&credentials)
        })
        .await
    }

    pub async fn sign_in_with_passkey(&self) -> AttemptOutcome {
        if !self.flags.snapshot().contains(&AttemptMethod::Passkey) {
            return AttemptOutcome::Invalid(ValidationError::PasskeyDisabled);
        }

        self.attempt(AttemptMethod::Passkey, || self.service.sign_in_with_passkey())
            .await
    }

    pub async fn sign_in_with_provider(&self, provider: &str) -> AttemptOutcome {
        let name = provider.trim().to_ascii_lowercase();
        let method = AttemptMethod::Provider(name.clone());
        if name.is_empty() || !self.flags.snapshot().contains(&method) {
            return AttemptOutcome::Invalid(ValidationError::UnknownProvider(provider.to_string()));
        }

        self.attempt(method, || self.service.sign_in_with_provider(&name))
            .await
    }

    async fn attempt<F, Fut>(&self, method: AttemptMethod, call: F) -> AttemptOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SignInGrant, AuthError>>,
    {
        let lease = match self.flags.try_acquire(&method) {
            Ok(lease) => lease,
            Err(AcquireError::Busy) => {
                debug!("Sign-in with {method} ignored, another attempt is in flight");
                return AttemptOutcome::Refused;
            }
            Err(AcquireError::Unknown) => {
                return AttemptOutcome::Invalid(ValidationError::UnknownProvider(
                    method.to_string(),
                ));
            }
        };

        let result = {
            let _notice = LoadingNotice::show(self.notifier.as_ref(), &loading_message(&method));
            let result = call().await;
            // Idle again before navigation and notices run.
            drop(lease);
            result
        };

        match result {
            Ok(grant) => {
                let destination = grant.redirect_url.unwrap_or_else(|| self.landing.clone());
                info!("Sign-in with {method} succeeded, navigating to {destination}");
                self.navigator.navigate(&destination);
                self.notifier.success(&success_message(&method));
                AttemptOutcome::SignedIn { destination }
            }
            Err(err) => {
                match &err {
                    AuthError::Transport(detail) => {
                        error!("Sign-in with {method} failed: {detail}");
                    }
                    AuthError::Service { .. } => warn!("Sign-in with {method} rejected: {err}"),
                }
                let message = err
                    .user_message()
                    .map_or_else(|| failure_message(&method), str::to_string);
                self.notifier.error(&message);
                AttemptOutcome::Failed { message }
            }
        }
    }
}

fn loading_message(method: &AttemptMethod) -> String {
    match method {
        AttemptMethod::Email => "Signing in...".to_string(),
        AttemptMethod::Passkey => "Authenticating with passkey...".to_string(),
        AttemptMethod::Provider(name) => format!("Signing in with {}...", display_name(name)),
    }
}

fn success_message(method: &AttemptMethod) -> String {
    match method {
        AttemptMethod::Email => "Successfully signed in!".to_string(),
        AttemptMethod::Passkey => "Successfully signed in with passkey!".to_string(),
        AttemptMethod::Provider(name) => {
            format!("Successfully signed in with {}!", display_name(name))
        }
    }
}

fn failure_message(method: &AttemptMethod) -> String {
    match method {
        AttemptMethod::Email => "Failed to sign in with email".to_string(),
        AttemptMethod::Passkey => "Failed to sign in with passkey".to_string(),
        AttemptMethod::Provider(name) => format!("Failed to sign in with {}", display_name(name)),
    }
}

/// `google` -> `Google`, `github` -> `GitHub`.
pub(crate) fn display_name(provider: &str) -> String {
    match provider {
        "github" => "GitHub".to_string(),
        "gitlab" => "GitLab".to_string(),
        other => {
            let mut chars = other.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::StubAuthService;
    use crate::client::test_support::{BusyWitness, RecordingNavigator, RecordingNotifier};

    struct Form {
        stub: Arc<StubAuthService>,
        notifier: Arc<RecordingNotifier>,
        navigator: Arc<RecordingNavigator>,
        orchestrator: SignInOrchestrator,
    }

    fn form() -> Form {
        let stub = Arc::new(StubAuthService::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let orchestrator = SignInOrchestrator::new(
            stub.clone(),
            notifier.clone(),
            navigator.clone(),
            [
                AttemptMethod::Passkey,
                AttemptMethod::provider("google"),
                AttemptMethod::provider("github"),
            ],
        );
        Form {
            stub,
            notifier,
            navigator,
            orchestrator,
        }
    }

    fn password(value: &str) -> SecretString {
        SecretString::from(value)
    }

    #[tokio::test]
    async fn empty_password_is_rejected_without_a_call() {
        let form = form();
        let outcome = form
            .orchestrator
            .sign_in_with_email("a@b.com", password(""), false)
            .await;

        assert_eq!(
            outcome,
            AttemptOutcome::Invalid(ValidationError::MissingCredentials)
        );
        assert!(form.stub.calls().is_empty());
        assert!(!form.orchestrator.is_busy());
        assert!(form.notifier.loading_messages().is_empty());
    }

    #[tokio::test]
    async fn unknown_provider_is_rejected_without_a_call() {
        let form = form();
        let outcome = form.orchestrator.sign_in_with_provider("gitlab").await;
        assert_eq!(
            outcome,
            AttemptOutcome::Invalid(ValidationError::UnknownProvider("gitlab".to_string()))
        );
        assert_eq!(
            form.orchestrator.sign_in_with_provider("  ").await,
            AttemptOutcome::Invalid(ValidationError::UnknownProvider("  ".to_string()))
        );
        assert!(form.stub.calls().is_empty());
    }

    #[tokio::test]
    async fn passkey_requires_configuration() {
        let stub = Arc::new(StubAuthService::new());
        let orchestrator = SignInOrchestrator::new(
            stub.clone(),
            Arc::new(RecordingNotifier::default()),
            Arc::new(RecordingNavigator::default()),
            [],
        );
        assert_eq!(
            orchestrator.sign_in_with_passkey().await,
            AttemptOutcome::Invalid(ValidationError::PasskeyDisabled)
        );
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn email_success_navigates_to_landing() {
        let form = form();
        let outcome = form
            .orchestrator
            .sign_in_with_email(" ada@example.com ", password("hunter2"), true)
            .await;

        assert_eq!(
            outcome,
            AttemptOutcome::SignedIn {
                destination: "/dashboard".to_string()
            }
        );
        assert_eq!(form.stub.calls(), vec!["email:ada@example.com"]);
        assert_eq!(form.navigator.visited(), vec!["/dashboard"]);
        assert_eq!(form.notifier.loading_messages(), vec!["Signing in..."]);
        assert_eq!(form.notifier.open_loading(), 0);
        assert_eq!(form.notifier.successes(), vec!["Successfully signed in!"]);
        assert!(!form.orchestrator.is_busy());
    }

    #[tokio::test]
    async fn provider_redirect_url_takes_precedence_over_landing() {
        let form = form();
        form.stub.set_sign_in(Ok(SignInGrant::redirect(
            "https://accounts.google.com/o/oauth2/auth?state=xyz",
        )));

        let outcome = form.orchestrator.sign_in_with_provider("Google").await;

        assert!(outcome.is_signed_in());
        assert_eq!(form.stub.calls(), vec!["provider:google"]);
        assert_eq!(
            form.navigator.visited(),
            vec!["https://accounts.google.com/o/oauth2/auth?state=xyz"]
        );
        assert_eq!(
            form.notifier.loading_messages(),
            vec!["Signing in with Google..."]
        );
        assert_eq!(
            form.notifier.successes(),
            vec!["Successfully signed in with Google!"]
        );
    }

    #[tokio::test]
    async fn provider_failure_shows_service_message_and_releases_form() {
        let form = form();
        form.stub
            .set_sign_in(Err(AuthError::service("invalid_grant")));
        let google = AttemptMethod::provider("google");

        let outcome = form.orchestrator.sign_in_with_provider("google").await;

        assert_eq!(
            outcome,
            AttemptOutcome::Failed {
                message: "invalid_grant".to_string()
            }
        );
        assert_eq!(form.notifier.errors(), vec!["invalid_grant"]);
        assert!(!form.orchestrator.is_method_busy(&google));
        assert!(!form.orchestrator.is_busy());
        assert!(form.navigator.visited().is_empty());
        assert_eq!(form.notifier.open_loading(), 0);

        // Any method can be retried right away.
        form.stub.set_sign_in(Ok(SignInGrant::completed()));
        assert!(form.orchestrator.sign_in_with_passkey().await.is_signed_in());
    }

    #[tokio::test]
    async fn failures_without_message_use_method_fallbacks() {
        let form = form();
        form.stub.set_sign_in(Err(AuthError::Service { message: None }));
        assert_eq!(
            form.orchestrator.sign_in_with_passkey().await,
            AttemptOutcome::Failed {
                message: "Failed to sign in with passkey".to_string()
            }
        );

        form.stub
            .set_sign_in(Err(AuthError::Transport("connection refused".to_string())));
        assert_eq!(
            form.orchestrator
                .sign_in_with_email("a@b.com", password("pw"), false)
                .await,
            AttemptOutcome::Failed {
                message: "Failed to sign in with email".to_string()
            }
        );
        assert_eq!(
            form.orchestrator.sign_in_with_provider("github").await,
            AttemptOutcome::Failed {
                message: "Failed to sign in with GitHub".to_string()
            }
        );
        assert!(!form.orchestrator.is_busy());
    }

    async fn busy_only_while_in_flight(result: Result<SignInGrant, AuthError>) {
        let form = form();
        form.stub.set_sign_in(result);
        let release = form.stub.hold_calls();
        let entered = form.stub.entered();
        let passkey = AttemptMethod::Passkey;

        assert!(!form.orchestrator.is_method_busy(&passkey));
        let orchestrator = form.orchestrator.clone();
        let task = tokio::spawn(async move { orchestrator.sign_in_with_passkey().await });

        entered.notified().await;
        assert!(form.orchestrator.is_method_busy(&passkey));
        assert!(form.orchestrator.is_busy());
        assert_eq!(form.notifier.open_loading(), 1);

        release.notify_one();
        let outcome = task.await;
        assert!(outcome.is_ok());
        assert!(!form.orchestrator.is_method_busy(&passkey));
        assert!(!form.orchestrator.is_busy());
        assert_eq!(form.notifier.open_loading(), 0);
    }

    #[tokio::test]
    async fn busy_flag_spans_successful_call() {
        busy_only_while_in_flight(Ok(SignInGrant::completed())).await;
    }

    #[tokio::test]
    async fn busy_flag_spans_rejected_call() {
        busy_only_while_in_flight(Err(AuthError::service("bad passkey"))).await;
    }

    #[tokio::test]
    async fn busy_flag_spans_transport_failure() {
        busy_only_while_in_flight(Err(AuthError::Transport("timeout".to_string()))).await;
    }

    #[tokio::test]
    async fn form_is_idle_before_navigation_and_notices() {
        let stub = Arc::new(StubAuthService::new());
        let witness = Arc::new(BusyWitness::default());
        let orchestrator = SignInOrchestrator::new(
            stub.clone(),
            witness.clone(),
            witness.clone(),
            [AttemptMethod::provider("google")],
        );
        let flags = orchestrator.flags.clone();
        witness.watch(move || flags.snapshot().any_busy());

        assert!(orchestrator.sign_in_with_provider("google").await.is_signed_in());
        stub.set_sign_in(Err(AuthError::service("invalid_grant")));
        assert_eq!(
            orchestrator.sign_in_with_provider("google").await,
            AttemptOutcome::Failed {
                message: "invalid_grant".to_string()
            }
        );

        let effect = |text: &str, busy| (text.to_string(), busy);
        assert_eq!(
            witness.seen(),
            vec![
                effect("loading: Signing in with Google...", true),
                effect("navigate: /dashboard", false),
                effect("success: Successfully signed in with Google!", false),
                effect("loading: Signing in with Google...", true),
                effect("error: invalid_grant", false),
            ]
        );
    }

    #[tokio::test]
    async fn second_dispatch_while_busy_is_a_no_op() {
        let form = form();
        let release = form.stub.hold_calls();
        let entered = form.stub.entered();

        let orchestrator = form.orchestrator.clone();
        let first = tokio::spawn(async move {
            orchestrator
                .sign_in_with_email("a@b.com", SecretString::from("pw"), false)
                .await
        });
        entered.notified().await;
        let before = form.orchestrator.state();

        assert_eq!(
            form.orchestrator.sign_in_with_provider("google").await,
            AttemptOutcome::Refused
        );
        assert_eq!(
            form.orchestrator.sign_in_with_passkey().await,
            AttemptOutcome::Refused
        );
        assert_eq!(form.orchestrator.state(), before);
        assert_eq!(form.stub.calls(), vec!["email:a@b.com"]);

        release.notify_one();
        assert!(matches!(first.await, Ok(AttemptOutcome::SignedIn { .. })));
        assert_eq!(form.stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn dropping_in_flight_attempt_clears_busy() {
        let form = form();
        let _release = form.stub.hold_calls();
        let entered = form.stub.entered();

        let orchestrator = form.orchestrator.clone();
        let task = tokio::spawn(async move { orchestrator.sign_in_with_provider("github").await });
        entered.notified().await;
        assert!(form.orchestrator.is_busy());

        task.abort();
        assert!(task.await.is_err());
        assert!(!form.orchestrator.is_busy());
        assert_eq!(form.notifier.open_loading(), 0);
    }

    #[test]
    fn provider_display_names() {
        assert_eq!(display_name("google"), "Google");
        assert_eq!(display_name("github"), "GitHub");
        assert_eq!(display_name(""), "");
    }
}
