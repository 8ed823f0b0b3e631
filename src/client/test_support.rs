//! Recording notifier and navigator for client action tests.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use super::notify::{Navigator, NotificationId, Notifier};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    loading: Mutex<Vec<(NotificationId, String)>>,
    shown: Mutex<Vec<String>>,
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Loading notifications shown and not yet dismissed.
    pub(crate) fn open_loading(&self) -> usize {
        lock(&self.loading).len()
    }

    /// Every loading message ever shown, in order.
    pub(crate) fn loading_messages(&self) -> Vec<String> {
        lock(&self.shown).clone()
    }

    pub(crate) fn successes(&self) -> Vec<String> {
        lock(&self.successes).clone()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn loading(&self, message: &str) -> NotificationId {
        let id = NotificationId::new();
        lock(&self.loading).push((id, message.to_string()));
        lock(&self.shown).push(message.to_string());
        id
    }

    fn dismiss(&self, id: NotificationId) {
        lock(&self.loading).retain(|(open, _)| *open != id);
    }

    fn success(&self, message: &str) {
        lock(&self.successes).push(message.to_string());
    }

    fn error(&self, message: &str) {
        lock(&self.errors).push(message.to_string());
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub(crate) fn visited(&self) -> Vec<String> {
        lock(&self.visited).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: &str) {
        lock(&self.visited).push(destination.to_string());
    }
}

type BusyCheck = Box<dyn Fn() -> bool + Send + Sync>;

/// Notifier and navigator recording each effect with the busy state seen
/// while it ran.
#[derive(Default)]
pub(crate) struct BusyWitness {
    busy: OnceLock<BusyCheck>,
    seen: Mutex<Vec<(String, bool)>>,
}

impl BusyWitness {
    pub(crate) fn watch(&self, busy: impl Fn() -> bool + Send + Sync + 'static) {
        let _ = self.busy.set(Box::new(busy));
    }

    pub(crate) fn seen(&self) -> Vec<(String, bool)> {
        lock(&self.seen).clone()
    }

    fn record(&self, effect: String) {
        let busy = self.busy.get().is_some_and(|check| check());
        lock(&self.seen).push((effect, busy));
    }
}

impl Notifier for BusyWitness {
    fn loading(&self, message: &str) -> NotificationId {
        self.record(format!("loading: {message}"));
        NotificationId::new()
    }

    fn dismiss(&self, _id: NotificationId) {}

    fn success(&self, message: &str) {
        self.record(format!("success: {message}"));
    }

    fn error(&self, message: &str) {
        self.record(format!("error: {message}"));
    }
}

impl Navigator for BusyWitness {
    fn navigate(&self, destination: &str) {
        self.record(format!("navigate: {destination}"));
    }
}
