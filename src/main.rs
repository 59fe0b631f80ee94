use tokio::net::TcpListener;
use tracing::info;

use rental_service::{
    routes::build_router,
    services::database::Database,
    utilities::{app_state::AppState, config::Config, errors::AppError},
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level)
        .init();

    let database = Database::connect(&config).await?;
    let state = AppState { database, config };

    let listener = TcpListener::bind(&state.config.server_address).await?;
    info!("listening on {}", state.config.server_address);

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
