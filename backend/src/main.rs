//! Backend entry-point: loads settings, migrates the schema and serves the API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig};
use server::{ServerConfig, ServerSettings, create_server};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|err| io::Error::other(format!("load configuration: {err}")))?;
    let database_url = settings.database_url().map_err(io::Error::other)?.to_owned();

    apply_migrations(database_url.clone()).await?;

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(|err| io::Error::other(format!("create database pool: {err}")))?;

    let config = ServerConfig::new(
        settings.bind_addr().map_err(io::Error::other)?,
        pool,
        settings.public_urls().map_err(io::Error::other)?,
    )
    .with_media(
        settings.media_root(),
        settings.media_url().map_err(io::Error::other)?,
    );

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(server::build_prometheus_metrics));

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}

/// Run pending embedded migrations on a blocking thread.
async fn apply_migrations(database_url: String) -> io::Result<()> {
    let applied = tokio::task::spawn_blocking(move || -> io::Result<usize> {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|err| io::Error::other(format!("connect for migrations: {err}")))?;
        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| io::Error::other(format!("run migrations: {err}")))?;
        Ok(versions.len())
    })
    .await
    .map_err(|err| io::Error::other(format!("migration task failed: {err}")))??;
    info!(applied, "database migrations applied");
    Ok(())
}

/// Build Prometheus middleware, logging and continuing without it on failure.
#[cfg(feature = "metrics")]
fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "metrics disabled: Prometheus setup failed");
            None
        }
    }
}
