use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::Query;

use crate::{
    features::{
        schemas::ListResponse,
        search::{repository::perform_search, schemas::SearchQuery},
    },
    services::database::Database,
    utilities::errors::AppError,
};

/// Public search over published listings. No authentication required.
pub async fn search_properties_handler(
    State(database): State<Database>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (items, total) = perform_search(&database.pool, &query).await?;
    Ok(Json(ListResponse { items, total }))
}
