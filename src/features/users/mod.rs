pub mod handlers;
pub mod models;
pub mod repository;
pub mod schemas;

use axum::{Router, routing::get};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/users/me", get(handlers::get_me_handler))
}
