pub mod handlers;
pub mod models;
pub mod repository;
pub mod schemas;
pub mod transitions;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/applications",
            post(handlers::create_application_handler),
        )
        .route(
            "/api/v1/applications/{id}",
            patch(handlers::update_application_status_handler),
        )
        .route(
            "/api/v1/applications/my-applications",
            get(handlers::list_my_applications_handler),
        )
        .route(
            "/api/v1/applications/received",
            get(handlers::list_received_applications_handler),
        )
}
