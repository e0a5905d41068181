//! Contains all the routes that this application can handle.

mod api;
mod thank_you;

// re-export errors
pub use api::subscribe::SubscribeError;

use crate::{web::THANK_YOU_PATH, AppState};
use thank_you::thank_you;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route(THANK_YOU_PATH, get(thank_you))
        .nest("/api", api_routes(app_state))
        .route("/health-check", get(health_check))
}

/// API - Routes nested under "/api" path
fn api_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/subscribe",
            post(api::subscribe).fallback(api::subscribe_method_not_allowed),
        )
        .with_state(app_state)
}
