//! Taskboard server entry-point.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, ServerConfig, create_server};
use taskboard::inbound::http::health::HealthState;
use taskboard::inbound::http::session_config::{BuildMode, session_settings_from_env};
use taskboard::outbound::persistence::{DbPool, PoolConfig, run_migrations};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|error| io::Error::other(error.to_string()))?;
    info!(
        fingerprint = %session.key_fingerprint(),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );
    let bind_addr = settings
        .bind_addr()
        .map_err(|error| io::Error::other(format!("invalid bind address: {error}")))?;

    let pool = match settings.database_url() {
        Some(url) => {
            run_migrations(url.to_owned())
                .await
                .map_err(|error| io::Error::other(format!("run migrations: {error}")))?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
            Some(pool)
        }
        None => None,
    };

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        settings,
    );
    if let Some(pool) = pool {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
