use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use nest_db::schema::initialize_database;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;

    info!("Connecting to database...");
    let db_pool = nest_db::create_pool(&database_url, 1).await?;

    initialize_database(&db_pool).await?;
    info!("Migration finished");

    Ok(())
}
