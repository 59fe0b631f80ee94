use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    features::{
        applications::{
            repository::{
                create_application, list_my_applications, list_received_applications,
                update_application_status,
            },
            schemas::{ApplicationIn, ApplicationStatusIn, ApplicationsQuery},
        },
        schemas::ListResponse,
        users::models::UserRole,
    },
    services::database::Database,
    utilities::{access::require_role, errors::AppError, jwt::Claims, pagination::Pagination},
};

pub async fn create_application_handler(
    claims: Claims,
    State(database): State<Database>,
    Json(application_in): Json<ApplicationIn>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, &[UserRole::Tenant])?;

    let application =
        create_application(&database.pool, claims.sub, application_in.property_id).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn update_application_status_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(application_id): Path<Uuid>,
    Json(status_in): Json<ApplicationStatusIn>,
) -> Result<impl IntoResponse, AppError> {
    let application =
        update_application_status(&database.pool, application_id, &claims, status_in.status)
            .await?;
    Ok(Json(application))
}

pub async fn list_my_applications_handler(
    claims: Claims,
    State(database): State<Database>,
    Query(query): Query<ApplicationsQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, &[UserRole::Tenant])?;

    let pagination = Pagination::parse(&query.pagination);
    let (items, total) =
        list_my_applications(&database.pool, claims.sub, query.status, &pagination).await?;
    Ok(Json(ListResponse { items, total }))
}

pub async fn list_received_applications_handler(
    claims: Claims,
    State(database): State<Database>,
    Query(query): Query<ApplicationsQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, &[UserRole::Landlord, UserRole::Admin])?;

    let pagination = Pagination::parse(&query.pagination);
    let (items, total) =
        list_received_applications(&database.pool, claims.sub, query.status, &pagination).await?;
    Ok(Json(ListResponse { items, total }))
}
