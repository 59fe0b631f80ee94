use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    features::{
        catalog::models::CatalogKind,
        properties::{
            repository::{
                create_property, delete_property, get_property, link_catalog_entry, list_by_owner,
                list_public, unlink_catalog_entry, update_property,
            },
            schemas::{
                LinkAmenityIn, LinkRuleIn, MyPropertiesQuery, PropertyIn, PropertyUpdate,
                PublicPropertiesQuery,
            },
        },
        schemas::ListResponse,
        users::models::UserRole,
    },
    services::database::Database,
    utilities::{
        access::require_role,
        errors::AppError,
        jwt::{Claims, OptionalClaims},
        pagination::Pagination,
    },
};

pub async fn list_public_properties_handler(
    State(database): State<Database>,
    Query(query): Query<PublicPropertiesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let pagination = Pagination::parse(&query.pagination);
    let (items, total) = list_public(&database.pool, &pagination).await?;
    Ok(Json(ListResponse { items, total }))
}

pub async fn list_my_properties_handler(
    claims: Claims,
    State(database): State<Database>,
    Query(query): Query<MyPropertiesQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, &[UserRole::Landlord, UserRole::Admin])?;

    let pagination = Pagination::parse(&query.pagination);
    let (items, total) =
        list_by_owner(&database.pool, claims.sub, query.status, &pagination).await?;
    Ok(Json(ListResponse { items, total }))
}

pub async fn get_property_handler(
    OptionalClaims(claims): OptionalClaims,
    State(database): State<Database>,
    Path(property_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let property = get_property(&database.pool, property_id, claims.as_ref()).await?;
    Ok(Json(property))
}

pub async fn create_property_handler(
    claims: Claims,
    State(database): State<Database>,
    Json(property_in): Json<PropertyIn>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, &[UserRole::Landlord])?;
    property_in.validate()?;

    let property = create_property(&database.pool, claims.sub, &property_in).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

pub async fn update_property_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(property_id): Path<Uuid>,
    Json(update): Json<PropertyUpdate>,
) -> Result<impl IntoResponse, AppError> {
    update.validate()?;

    let property = update_property(&database.pool, property_id, &claims, &update).await?;
    Ok(Json(property))
}

pub async fn delete_property_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(property_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    delete_property(&database.pool, property_id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_amenity_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(property_id): Path<Uuid>,
    Json(link): Json<LinkAmenityIn>,
) -> Result<impl IntoResponse, AppError> {
    link_catalog_entry(
        &database.pool,
        property_id,
        CatalogKind::Amenity,
        link.amenity_id,
        &claims,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Amenity linked"})),
    ))
}

pub async fn remove_amenity_handler(
    claims: Claims,
    State(database): State<Database>,
    Path((property_id, amenity_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    unlink_catalog_entry(
        &database.pool,
        property_id,
        CatalogKind::Amenity,
        amenity_id,
        &claims,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_rule_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(property_id): Path<Uuid>,
    Json(link): Json<LinkRuleIn>,
) -> Result<impl IntoResponse, AppError> {
    link_catalog_entry(
        &database.pool,
        property_id,
        CatalogKind::Rule,
        link.rule_id,
        &claims,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!({"message": "Rule linked"}))))
}

pub async fn remove_rule_handler(
    claims: Claims,
    State(database): State<Database>,
    Path((property_id, rule_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    unlink_catalog_entry(
        &database.pool,
        property_id,
        CatalogKind::Rule,
        rule_id,
        &claims,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
