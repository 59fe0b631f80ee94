use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    features,
    services::database::Database,
    utilities::{app_state::AppState, errors::AppError},
};

/// Liveness plus a database round trip, so an exhausted or unreachable
/// pool surfaces as 503 instead of a healthy-looking green.
async fn healthz_handler(State(database): State<Database>) -> Result<impl IntoResponse, AppError> {
    sqlx::query("SELECT 1").execute(&database.pool).await?;
    Ok(Json(json!({"status": "ok"})))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .merge(features::properties::routes())
        .merge(features::applications::routes())
        .merge(features::catalog::routes())
        .merge(features::search::routes())
        .merge(features::users::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
