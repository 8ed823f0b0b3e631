use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::sync::Arc;

use super::UserView;
use crate::{api::state::Gate, auth::RequestContext};

#[derive(Debug, Serialize)]
pub struct Home {
    page: &'static str,
    signed_in: bool,
    user: Option<UserView>,
}

/// Landing page; shows the session when there is one, never redirects.
pub async fn home(headers: HeaderMap, Extension(gate): Extension<Arc<Gate>>) -> impl IntoResponse {
    let context = RequestContext::from_headers(&headers);
    let session = gate.query().get_session(&context).await;

    Json(Home {
        page: "home",
        signed_in: session.is_some(),
        user: session.as_ref().map(UserView::from),
    })
}
