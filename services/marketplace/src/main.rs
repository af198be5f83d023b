use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod error;
mod jwt;
mod middleware;
mod models;
mod repositories;
mod routes;
mod serialize;
mod validation;

use axum::extract::DefaultBodyLimit;
use tower_http::cors::CorsLayer;

use crate::jwt::JwtService;
use crate::repositories::{AuctionRepository, UserRepository};

/// Largest accepted request body; leaves room for embedded base64 images
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub auction_repository: AuctionRepository,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting marketplace service");

    // Initialize the document store handle
    let db_config = common::database::DatabaseConfig::from_env()?;
    let database = common::database::init_database(&db_config).await?;

    // Check store connectivity
    if common::database::health_check(&database).await? {
        info!("Document store connection successful");
    } else {
        anyhow::bail!("Failed to connect to document store");
    }

    // Initialize the JWT service
    let jwt_config = crate::jwt::JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    let user_repository = UserRepository::new(&database);
    let auction_repository = AuctionRepository::new(&database);

    // Unique email index backs registration conflicts
    user_repository.ensure_indexes().await?;

    info!("Marketplace service initialized successfully");

    let app_state = AppState {
        jwt_service,
        user_repository,
        auction_repository,
    };

    // Start the web server
    let app = routes::create_router(app_state)
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Marketplace service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
