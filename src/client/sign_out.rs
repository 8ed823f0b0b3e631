//! Sign-out action.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{error, info, warn};

use super::notify::{Navigator, Notifier};
use crate::auth::{AuthError, AuthService};

/// Anonymous landing page reached after signing out.
pub const SIGNED_OUT_PATH: &str = "/";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignOutOutcome {
    SignedOut,
    Failed { message: String },
    /// A sign-out was already in flight.
    Refused,
}

struct BusyLease(Arc<AtomicBool>);

impl BusyLease {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for BusyLease {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sign-out control, with a busy flag of its own.
#[derive(Clone)]
pub struct SignOutAction {
    service: Arc<dyn AuthService>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    busy: Arc<AtomicBool>,
}

impl SignOutAction {
    #[must_use]
    pub fn new(
        service: Arc<dyn AuthService>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            service,
            notifier,
            navigator,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn sign_out(&self) -> SignOutOutcome {
        let Some(lease) = BusyLease::acquire(&self.busy) else {
            return SignOutOutcome::Refused;
        };
        let result = self.service.sign_out().await;
        drop(lease);

        match result {
            Ok(()) => {
                info!("Signed out, navigating to {SIGNED_OUT_PATH}");
                self.navigator.navigate(SIGNED_OUT_PATH);
                self.notifier.success("Signed out successfully");
                SignOutOutcome::SignedOut
            }
            Err(err) => {
                match &err {
                    AuthError::Transport(detail) => error!("Sign-out failed: {detail}"),
                    AuthError::Service { .. } => warn!("Sign-out rejected: {err}"),
                }
                let message = err
                    .user_message()
                    .unwrap_or("Failed to sign out")
                    .to_string();
                self.notifier.error(&message);
                SignOutOutcome::Failed { message }
            }
        }
    }
}
