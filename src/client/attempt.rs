//! Per-method busy flags for one sign-in form.
//!
//! Checking "anything busy?" and marking a method busy happen under one lock,
//! so two concurrent dispatches can never both start. The flag is released by
//! `AttemptLease::drop`, which runs on success, on failure, on panic and when
//! the in-flight future is dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One authentication channel of the sign-in form.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttemptMethod {
    Email,
    Passkey,
    Provider(String),
}

impl AttemptMethod {
    #[must_use]
    pub fn provider(name: impl Into<String>) -> Self {
        Self::Provider(name.into().trim().to_ascii_lowercase())
    }

    /// Parse `email`, `passkey` or `provider:<name>`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "email" => Some(Self::Email),
            "passkey" => Some(Self::Passkey),
            other => other
                .strip_prefix("provider:")
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(Self::provider),
        }
    }
}

impl fmt::Display for AttemptMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Passkey => f.write_str("passkey"),
            Self::Provider(name) => write!(f, "provider:{name}"),
        }
    }
}

/// Busy flag per configured method; all idle on creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthAttemptState {
    flags: BTreeMap<AttemptMethod, bool>,
}

impl AuthAttemptState {
    /// The email method is always present; `supplementary` adds passkey and
    /// providers. Duplicates collapse.
    #[must_use]
    pub fn new(supplementary: impl IntoIterator<Item = AttemptMethod>) -> Self {
        let mut flags = BTreeMap::new();
        flags.insert(AttemptMethod::Email, false);
        for method in supplementary {
            flags.insert(method, false);
        }
        Self { flags }
    }

    #[must_use]
    pub fn contains(&self, method: &AttemptMethod) -> bool {
        self.flags.contains_key(method)
    }

    #[must_use]
    pub fn is_busy(&self, method: &AttemptMethod) -> bool {
        self.flags.get(method).copied().unwrap_or(false)
    }

    /// Global busy predicate: true while any method is in flight.
    #[must_use]
    pub fn any_busy(&self) -> bool {
        self.flags.values().any(|busy| *busy)
    }

    pub fn methods(&self) -> impl Iterator<Item = &AttemptMethod> {
        self.flags.keys()
    }

    fn set(&mut self, method: &AttemptMethod, busy: bool) {
        if let Some(flag) = self.flags.get_mut(method) {
            *flag = busy;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum AcquireError {
    /// Another attempt is in flight.
    Busy,
    /// The method is not offered by this form.
    Unknown,
}

/// Shared handle over the flag map.
#[derive(Clone, Debug)]
pub(crate) struct AttemptFlags {
    state: Arc<Mutex<AuthAttemptState>>,
}

impl AttemptFlags {
    pub(crate) fn new(state: AuthAttemptState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AuthAttemptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn snapshot(&self) -> AuthAttemptState {
        self.lock().clone()
    }

    pub(crate) fn try_acquire(&self, method: &AttemptMethod) -> Result<AttemptLease, AcquireError> {
        let mut state = self.lock();
        if !state.contains(method) {
            return Err(AcquireError::Unknown);
        }
        if state.any_busy() {
            return Err(AcquireError::Busy);
        }
        state.set(method, true);
        Ok(AttemptLease {
            flags: self.clone(),
            method: method.clone(),
        })
    }
}

/// Proof that `method` is in flight; dropping it marks the method idle.
#[derive(Debug)]
pub(crate) struct AttemptLease {
    flags: AttemptFlags,
    method: AttemptMethod,
}

impl Drop for AttemptLease {
    fn drop(&mut self) {
        self.flags.lock().set(&self.method, false);
    }
}
