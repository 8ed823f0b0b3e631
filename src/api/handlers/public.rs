use axum::{
    extract::Extension,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::sync::Arc;

use crate::{api::extract::PublicOnly, api::state::Gate, client::AttemptMethod};

#[derive(Debug, Serialize)]
pub struct SignInPage {
    page: &'static str,
    methods: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SignUpPage {
    page: &'static str,
}

/// Sign-in form: email first, then passkey and providers as configured.
pub async fn sign_in(_: PublicOnly, Extension(gate): Extension<Arc<Gate>>) -> impl IntoResponse {
    let methods = std::iter::once(AttemptMethod::Email)
        .chain(gate.config().methods())
        .map(|method| method.to_string())
        .collect();

    Json(SignInPage {
        page: "sign-in",
        methods,
    })
}

pub async fn sign_up(_: PublicOnly) -> impl IntoResponse {
    Json(SignUpPage { page: "sign-up" })
}
