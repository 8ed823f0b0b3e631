use axum::response::{IntoResponse, Json};
use serde::Serialize;

use super::UserView;
use crate::api::extract::Protected;

#[derive(Debug, Serialize)]
pub struct Page {
    page: &'static str,
    user: UserView,
    #[serde(skip_serializing_if = "Option::is_none")]
    editable: Option<bool>,
}

impl Page {
    fn new(page: &'static str, protected: &Protected) -> Self {
        Self {
            page,
            user: UserView::from(&protected.0),
            editable: None,
        }
    }
}

pub async fn dashboard(protected: Protected) -> impl IntoResponse {
    Json(Page::new("dashboard", &protected))
}

pub async fn account(protected: Protected) -> impl IntoResponse {
    Json(Page::new("account", &protected))
}

/// Profile editing is not offered yet; the page says so.
pub async fn account_edit(protected: Protected) -> impl IntoResponse {
    Json(Page {
        editable: Some(false),
        ..Page::new("account-edit", &protected)
    })
}
