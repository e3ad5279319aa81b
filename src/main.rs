use color_eyre::eyre::Result;
use dotenv::dotenv;
use nest_api::config::ApiConfig;
use nest_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(&config.database_url, config.database_max_connections).await?;

    // Tables are created idempotently on every start
    initialize_database(&db_pool).await?;

    nest_api::start_server(config, db_pool).await?;

    Ok(())
}
