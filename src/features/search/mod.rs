pub mod handlers;
pub mod repository;
pub mod schemas;

use axum::{Router, routing::get};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/search", get(handlers::search_properties_handler))
}
