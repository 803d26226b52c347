//! Service entry-point: loads settings, prepares storage and serves HTTP.

mod server;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use prowd_backend::inbound::http::health::HealthState;
use prowd_backend::outbound::persistence::{DbPool, run_pending_migrations};
use prowd_backend::settings::ServiceSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load()
        .map_err(|err| eyre!("failed to load configuration: {err}"))?
        .with_platform_fallbacks(&DefaultEnv::new());

    let mut config = ServerConfig::new(settings.bind_addr(), settings.operation_timeout());
    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations() {
            run_pending_migrations(database_url)
                .await
                .wrap_err("failed to prepare database schema")?;
        }
        let pool = DbPool::new(settings.pool_config(database_url))
            .await
            .wrap_err("failed to create database pool")?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(Some(server::prometheus_exporter()?));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).wrap_err("failed to bind server")?;

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        health_state.mark_draining();
        handle.stop(true).await;
    });

    server.await.wrap_err("server terminated with an error")?;
    info!("shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                warn!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, draining"),
        () = terminate => info!("received terminate signal, draining"),
    }
}
