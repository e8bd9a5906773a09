use dotenvy::dotenv;
use furniture_catalog::{
    api::{self, AppState},
    config::{database, server::ServerConfig},
    errors::Result,
    logging,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    logging::init_tracing("info");

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Server settings
    let server_config = ServerConfig::from_env()
        .inspect_err(|e| error!("Invalid server configuration: {}", e))?;

    // 4. Database connection and schema
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Serve the API until Ctrl-C
    api::serve(AppState::new(db), server_config.bind_addr).await
}
