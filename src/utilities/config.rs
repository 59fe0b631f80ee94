use std::{env, str::FromStr};

use tracing::Level;

use crate::utilities::errors::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: String,
    pub tracing_level: Level,

    // DATABASE
    pub database_url: String,
    pub database_max_connections: u32,

    // TOKENS
    pub secret_key: String,
    pub access_token_expire_in_minute: i64,
    pub refresh_token_expire_in_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            server_address: env::var("SERVER_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            tracing_level: env::var("TRACING_LEVEL")
                .ok()
                .and_then(|level| Level::from_str(&level).ok())
                .unwrap_or(Level::INFO),
            database_url: env::var("DATABASE_URL")
                .map_err(|_| AppError::MissingEnvVar("DATABASE_URL"))?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(10),
            secret_key: env::var("SECRET_KEY")
                .map_err(|_| AppError::MissingEnvVar("SECRET_KEY"))?,
            access_token_expire_in_minute: env::var("ACCESS_TOKEN_EXPIRE_IN_MINUTE")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(30),
            refresh_token_expire_in_days: env::var("REFRESH_TOKEN_EXPIRE_IN_DAYS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(7),
        })
    }
}
