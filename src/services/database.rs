use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::utilities::{config::Config, errors::AppError};

#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await
            .map_err(|_| AppError::DatabaseConnectionError)?;

        sqlx::migrate!().run(&pool).await?;
        info!("database connected, migrations applied");

        Ok(Self { pool })
    }
}
