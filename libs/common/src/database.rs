//! Document-store connection handling for the marketplace

use anyhow::Result;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::time::Duration;
use tracing::{error, info};

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// MongoDB connection URI
    pub uri: String,
    /// Name of the database holding the marketplace collections
    pub database: String,
    /// Server selection timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `MONGODB_URI`: connection URI (default: mongodb://localhost:27017)
    /// - `MONGODB_DATABASE`: database name (default: auction_system)
    /// - `MONGODB_CONNECTION_TIMEOUT`: server selection timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self> {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let database =
            std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "auction_system".to_string());

        let connection_timeout = std::env::var("MONGODB_CONNECTION_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(DatabaseConfig {
            uri,
            database,
            connection_timeout,
        })
    }
}

/// Initialize a MongoDB client and return a handle to the configured database
pub async fn init_database(config: &DatabaseConfig) -> Result<Database> {
    info!("Initializing document store client");

    let mut options = ClientOptions::parse(&config.uri).await?;
    options.server_selection_timeout = Some(Duration::from_secs(config.connection_timeout));

    let client = Client::with_options(options)?;
    let database = client.database(&config.database);

    info!("Document store client initialized successfully");
    Ok(database)
}

/// Check document-store connectivity
///
/// # Arguments
/// * `database` - Database handle
///
/// # Returns
/// * `Result<bool>` - True if the store is reachable, false otherwise
pub async fn health_check(database: &Database) -> Result<bool> {
    match database.run_command(doc! { "ping": 1 }).await {
        Ok(_) => {
            info!("Document store health check successful");
            Ok(true)
        }
        Err(e) => {
            error!("Document store health check failed: {}", e);
            Ok(false)
        }
    }
}
