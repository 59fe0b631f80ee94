pub mod handlers;
pub mod models;
pub mod repository;
pub mod schemas;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/amenities", get(handlers::list_amenities_handler))
        .route("/api/v1/amenities", post(handlers::create_amenity_handler))
        .route(
            "/api/v1/amenities/{id}",
            patch(handlers::update_amenity_handler),
        )
        .route(
            "/api/v1/amenities/{id}",
            delete(handlers::delete_amenity_handler),
        )
        .route("/api/v1/rules", get(handlers::list_rules_handler))
        .route("/api/v1/rules", post(handlers::create_rule_handler))
        .route("/api/v1/rules/{id}", patch(handlers::update_rule_handler))
        .route("/api/v1/rules/{id}", delete(handlers::delete_rule_handler))
}
