pub mod checkins;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", checkins::routes().with_state(state))
}
