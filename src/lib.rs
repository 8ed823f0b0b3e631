//! # Portico (session gate)
//!
//! `portico` sits in front of the pages of a web application and decides, for
//! every request, whether the visitor may see the page. It owns no credentials
//! and no session store: an external Auth Service does, and `portico` only asks
//! it who the visitor is.
//!
//! ## Pieces
//!
//! - [`auth`]: session query, access decision, route guard and the inverse
//!   redirect for public-only pages, plus the `reqwest` Auth Service client.
//! - [`client`]: the sign-in orchestrator (email, passkey, OAuth providers)
//!   and the sign-out action, with one-attempt-at-a-time busy tracking.
//! - [`api`]: the `axum` router that applies the gates to each page.
//! - [`cli`]: argument parsing, telemetry and the `server`, `sign-in` and
//!   `sign-out` actions.
//!
//! ## Failure policy
//!
//! A session that cannot be read is treated as absent. Protected pages fail
//! closed and sign-in failures never leave the form stuck.

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
