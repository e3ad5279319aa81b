//! # Nest API
//!
//! HTTP surface of the Nest course and portfolio service: courses and
//! rosters, office hours and reservations, team peer evaluation, the Q&A
//! board and student portfolios.
//!
//! Every route area has a `routes::*` module that maps paths onto the matching
//! `handlers::*` functions. Handlers call the `nest_db` repositories and return
//! [`middleware::error_handling::AppError`] on failure.

pub mod config;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use eyre::{Result, WrapErr};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// State shared by every handler.
pub struct ApiState {
    pub db_pool: PgPool,
}

/// Builds the application router with every route and layer attached
///
/// # Errors
///
/// Fails when one of the configured CORS origins is not a valid header value.
pub fn build_router(state: Arc<ApiState>, config: &config::ApiConfig) -> Result<Router> {
    let app = Router::new()
        .merge(routes::health::routes())
        // Courses, students and rosters
        .merge(routes::course::routes())
        // User profiles and dashboards
        .merge(routes::user::routes())
        // Professor registry
        .merge(routes::professor::routes())
        // Office hours and reservations
        .merge(routes::schedule::routes())
        // Teams and peer evaluation
        .merge(routes::evaluation::routes())
        // Q&A board
        .merge(routes::question::routes())
        // Projects and summaries
        .merge(routes::portfolio::routes())
        // Practice problems
        .merge(routes::problem::routes())
        .with_state(state);

    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .wrap_err_with(|| format!("Invalid CORS origin '{}'", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Request tracing, then a timeout answering 408 for slow requests
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
            .into_inner(),
    );

    Ok(app)
}

/// Installs the log subscriber and serves the router on `config.server_addr()`
/// until the process stops.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState { db_pool });
    let app = build_router(state, &config)?;

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
