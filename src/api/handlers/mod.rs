//! JSON page views.
//!
//! Each body describes what the page shows; rendering is left to the client.

pub mod dashboard;
pub mod health;
pub mod home;
pub mod public;

use serde::Serialize;

use crate::auth::{Role, Session};

/// Signed-in user as shown in headers and account pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub avatar_initial: String,
    pub role: Option<Role>,
}

impl From<&Session> for UserView {
    fn from(session: &Session) -> Self {
        Self {
            id: session.user_id.clone(),
            name: session.display_name.clone(),
            email: session.email.clone(),
            avatar_url: session.avatar_url.clone(),
            avatar_initial: session.avatar_initial(),
            role: session.role,
        }
    }
}
