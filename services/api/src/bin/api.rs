//! services/api/src/bin/api.rs

use async_openai::{config::OpenAIConfig, Client};
use eco_api_lib::{
    adapters::{DbAdapter, InMemoryDbAdapter, OpenAiCoachAdapter, OpenAiRecommendationsAdapter},
    config::Config,
    error::ApiError,
    web::{self, state::AppState},
};
use eco_tracker_core::ports::DatabaseService;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    let db: Arc<dyn DatabaseService> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let db_adapter = DbAdapter::new(db_pool);
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db_adapter)
        }
        None => {
            warn!("DATABASE_URL is not set; using the in-memory store. Data will not survive a restart.");
            Arc::new(InMemoryDbAdapter::new())
        }
    };

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());
    let openai_client = Client::with_config(openai_config);

    let recommendations_adapter = Arc::new(OpenAiRecommendationsAdapter::new(
        openai_client.clone(),
        config.recommendation_model.clone(),
        config.ai_timeout,
    ));
    let coach_adapter = Arc::new(OpenAiCoachAdapter::new(
        openai_client,
        config.coach_model.clone(),
        config.ai_timeout,
    ));

    // --- 4. Build the Shared AppState and Router ---
    let app_state = Arc::new(AppState::new(
        db,
        config.clone(),
        recommendations_adapter,
        coach_adapter,
    ));
    let app = web::router(app_state)?;

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
