//! Gated HTTP surface.
//!
//! Protected pages sit behind `require_session` and re-check with the
//! `Protected` extractor. Public-only pages use `PublicOnly`. `/` and
//! `/health` are open.

use anyhow::Result;
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware::from_fn,
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{Span, info, info_span};
use ulid::Ulid;

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use extract::{Protected, PublicOnly};
pub use middleware::require_session;
pub use state::{Gate, GateConfig};

use handlers::{dashboard, health, home, public};

/// Build the router with every page and the shared layers.
#[must_use]
pub fn router(gate: Arc<Gate>) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/dashboard/account", get(dashboard::account))
        .route("/dashboard/account/edit", get(dashboard::account_edit))
        .route_layer(from_fn(require_session))
        // Legacy page: guarded by its own extractor only.
        .route("/account", get(dashboard::account));

    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/sign-in", get(public::sign_in))
        .route("/sign-up", get(public::sign_up))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(gate)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, gate: Arc<Gate>) -> Result<()> {
    let app = router(gate);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
