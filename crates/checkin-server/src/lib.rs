//! Local HTTP host for the check-in screens.
//!
//! Serves one device's own collection to its UI. It is not a sync or
//! multi-user backend; nothing here leaves the machine it runs on.

pub mod api;
pub mod error;
pub mod state;
pub mod types;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::api_routes(state).layer(cors)
}
