//! Client-side sign-in and sign-out flows.
//!
//! These run wherever the form lives (the `sign-in` / `sign-out` subcommands
//! here). Every Auth Service call resolves to an outcome value; notifications
//! and navigation are reported through the `Notifier` and `Navigator` traits.

pub mod attempt;
pub mod notify;
pub mod sign_in;
pub mod sign_out;

#[cfg(test)]
pub(crate) mod test_support;

pub use attempt::{AttemptMethod, AuthAttemptState};
pub use notify::{MemoryNavigator, Navigator, NotificationId, Notifier, TracingNotifier};
pub use sign_in::{AttemptOutcome, SignInOrchestrator, ValidationError};
pub use sign_out::{SIGNED_OUT_PATH, SignOutAction, SignOutOutcome};
