use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    features::users::{repository::get_user, schemas::UserOut},
    services::database::Database,
    utilities::{errors::AppError, jwt::Claims},
};

pub async fn get_me_handler(
    claims: Claims,
    State(database): State<Database>,
) -> Result<impl IntoResponse, AppError> {
    let user = get_user(&database.pool, claims.sub).await?;
    Ok(Json(UserOut::from(user)))
}
