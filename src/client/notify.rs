//! Notification and navigation surfaces driven by the client actions.

use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::{error, info};
use ulid::Ulid;

/// Handle of a notification that can be dismissed later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NotificationId(Ulid);

impl NotificationId {
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Toast-like surface. Implementations must be cheap and never fail.
pub trait Notifier: Send + Sync {
    fn loading(&self, message: &str) -> NotificationId;
    fn dismiss(&self, id: NotificationId);
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &str);
}

/// Loading notification dismissed when dropped, whatever the exit path.
pub(crate) struct LoadingNotice<'a> {
    notifier: &'a dyn Notifier,
    id: NotificationId,
}

impl<'a> LoadingNotice<'a> {
    pub(crate) fn show(notifier: &'a dyn Notifier, message: &str) -> Self {
        let id = notifier.loading(message);
        Self { notifier, id }
    }
}

impl Drop for LoadingNotice<'_> {
    fn drop(&mut self) {
        self.notifier.dismiss(self.id);
    }
}

/// Reports notifications as log events; used by the terminal client.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn loading(&self, message: &str) -> NotificationId {
        let id = NotificationId::new();
        info!(notification = %id, "{message}");
        id
    }

    fn dismiss(&self, _id: NotificationId) {}

    fn success(&self, message: &str) {
        info!("{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}

/// Keeps the last destination; the terminal client prints it on exit.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    destination: Mutex<Option<String>>,
}

impl MemoryNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn destination(&self) -> Option<String> {
        self.destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&self, destination: &str) {
        *self
            .destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(destination.to_string());
    }
}
