pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

/// Display name used when a professor has no name on record.
pub const UNKNOWN_NAME: &str = "No Name Available";

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}
