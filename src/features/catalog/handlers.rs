use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    features::catalog::{
        models::CatalogKind,
        repository::{create_entry, delete_entry, list_entries, update_entry},
        schemas::{CatalogEntryIn, CatalogEntryUpdate},
    },
    features::users::models::UserRole,
    services::database::Database,
    utilities::{access::require_role, errors::AppError, jwt::Claims},
};

// The shared helpers take their arguments by value so the opaque return
// types capture no borrows.

async fn list_catalog(database: Database, kind: CatalogKind) -> Result<impl IntoResponse, AppError> {
    let entries = list_entries(&database.pool, kind).await?;
    Ok(Json(entries))
}

async fn create_catalog(
    database: Database,
    kind: CatalogKind,
    claims: Claims,
    entry_in: CatalogEntryIn,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, &[UserRole::Admin])?;
    entry_in.validate()?;

    let entry = create_entry(&database.pool, kind, &entry_in).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_catalog(
    database: Database,
    kind: CatalogKind,
    claims: Claims,
    entry_id: Uuid,
    update: CatalogEntryUpdate,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, &[UserRole::Admin])?;
    update.validate()?;

    let entry = update_entry(&database.pool, kind, entry_id, &update).await?;
    Ok(Json(entry))
}

async fn delete_catalog(
    database: Database,
    kind: CatalogKind,
    claims: Claims,
    entry_id: Uuid,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, &[UserRole::Admin])?;

    delete_entry(&database.pool, kind, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Amenities

pub async fn list_amenities_handler(
    State(database): State<Database>,
) -> Result<impl IntoResponse, AppError> {
    list_catalog(database, CatalogKind::Amenity).await
}

pub async fn create_amenity_handler(
    claims: Claims,
    State(database): State<Database>,
    Json(entry_in): Json<CatalogEntryIn>,
) -> Result<impl IntoResponse, AppError> {
    create_catalog(database, CatalogKind::Amenity, claims, entry_in).await
}

pub async fn update_amenity_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(amenity_id): Path<Uuid>,
    Json(update): Json<CatalogEntryUpdate>,
) -> Result<impl IntoResponse, AppError> {
    update_catalog(database, CatalogKind::Amenity, claims, amenity_id, update).await
}

pub async fn delete_amenity_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(amenity_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    delete_catalog(database, CatalogKind::Amenity, claims, amenity_id).await
}

// Rules

pub async fn list_rules_handler(
    State(database): State<Database>,
) -> Result<impl IntoResponse, AppError> {
    list_catalog(database, CatalogKind::Rule).await
}

pub async fn create_rule_handler(
    claims: Claims,
    State(database): State<Database>,
    Json(entry_in): Json<CatalogEntryIn>,
) -> Result<impl IntoResponse, AppError> {
    create_catalog(database, CatalogKind::Rule, claims, entry_in).await
}

pub async fn update_rule_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(rule_id): Path<Uuid>,
    Json(update): Json<CatalogEntryUpdate>,
) -> Result<impl IntoResponse, AppError> {
    update_catalog(database, CatalogKind::Rule, claims, rule_id, update).await
}

pub async fn delete_rule_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(rule_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    delete_catalog(database, CatalogKind::Rule, claims, rule_id).await
}
