pub mod handlers;
pub mod models;
pub mod repository;
pub mod schemas;
pub mod transitions;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/properties",
            get(handlers::list_public_properties_handler),
        )
        .route(
            "/api/v1/properties/my-properties",
            get(handlers::list_my_properties_handler),
        )
        .route("/api/v1/properties/{id}", get(handlers::get_property_handler))
        .route("/api/v1/properties", post(handlers::create_property_handler))
        .route(
            "/api/v1/properties/{id}",
            patch(handlers::update_property_handler),
        )
        .route(
            "/api/v1/properties/{id}",
            delete(handlers::delete_property_handler),
        )
        .route(
            "/api/v1/properties/{id}/amenities",
            post(handlers::add_amenity_handler),
        )
        .route(
            "/api/v1/properties/{id}/amenities/{amenity_id}",
            delete(handlers::remove_amenity_handler),
        )
        .route(
            "/api/v1/properties/{id}/rules",
            post(handlers::add_rule_handler),
        )
        .route(
            "/api/v1/properties/{id}/rules/{rule_id}",
            delete(handlers::remove_rule_handler),
        )
}
