use crate::features::users::models::UserRole;
use crate::utilities::errors::AppError;
use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utilities::config::Config;

#[derive(Serialize, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// The identity context established by the authentication collaborator.
/// Handlers trust this completely; nothing beyond token verification
/// happens here.
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: Uuid,
    pub role: UserRole,
    pub typ: TokenType,
    pub exp: i64,
    pub iat: i64,
}

pub fn create_token(
    config: &Config,
    user_id: Uuid,
    role: UserRole,
    typ: TokenType,
) -> Result<String, AppError> {
    let now = Utc::now();

    let exp = now
        + match typ {
            TokenType::Access => Duration::minutes(config.access_token_expire_in_minute),
            TokenType::Refresh => Duration::days(config.refresh_token_expire_in_days),
        };

    let claims = Claims {
        sub: user_id,
        role,
        typ,
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
    let encoded_token = encode(&Header::new(Algorithm::HS256), &claims, &encoding_key)?;
    Ok(encoded_token)
}

pub fn verify_token(config: &Config, token: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_key.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

impl<S> FromRequestParts<S> for Claims
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::MissingAccessToken)?;

        let config = Config::from_ref(state);

        let claims = verify_token(&config, bearer.token())?;

        if claims.typ != TokenType::Access {
            return Err(AppError::Unauthorized("Access token required".into()));
        }

        Ok(claims)
    }
}

/// Optional-auth variant for public endpoints that still tailor visibility
/// to the caller (an owner viewing their own draft, for example). A missing
/// header yields `None`; a present-but-invalid token is still rejected.
pub struct OptionalClaims(pub Option<Claims>);

impl<S> FromRequestParts<S> for OptionalClaims
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .ok();

        let Some(TypedHeader(Authorization(bearer))) = bearer else {
            return Ok(OptionalClaims(None));
        };

        let config = Config::from_ref(state);
        let claims = verify_token(&config, bearer.token())?;

        if claims.typ != TokenType::Access {
            return Err(AppError::Unauthorized("Access token required".into()));
        }

        Ok(OptionalClaims(Some(claims)))
    }
}
