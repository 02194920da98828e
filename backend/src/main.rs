//! Backend entry-point: loads settings, wires adapters and serves the order
//! event hooks, the backfill trigger and health probes.

mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use pickup_backend::domain::ports::PushMessenger;
use pickup_backend::outbound::fcm::{FcmAccessToken, FcmHttpConfig, FcmHttpMessenger};
use pickup_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pickup_backend::settings::AppSettings;

use server::{ServerConfig, build_health_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr: SocketAddr = settings
        .bind_addr()
        .parse()
        .wrap_err_with(|| format!("invalid bind address {}", settings.bind_addr()))?;

    let mut config =
        ServerConfig::new(bind_addr).with_backfill_batch_size(settings.backfill_batch_size());
    if let Some(pool) = connect_database(&settings).await? {
        config = config.with_db_pool(pool);
    }
    if let Some(messenger) = build_messenger(&settings)? {
        config = config.with_messenger(messenger);
    }

    let health_state = web::Data::new(build_health_state(&config));
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "pickup backend listening");
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}

async fn connect_database(settings: &AppSettings) -> Result<Option<DbPool>> {
    let Some(database_url) = settings.database_url.as_deref() else {
        return Ok(None);
    };

    if settings.run_migrations() {
        let applied = run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply migrations")?;
        info!(applied, "database migrations applied");
    }

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .wrap_err("failed to build database pool")?;
    Ok(Some(pool))
}

fn build_messenger(settings: &AppSettings) -> Result<Option<Arc<dyn PushMessenger>>> {
    let Some((project_id, token_file)) = settings.fcm_credentials() else {
        return Ok(None);
    };

    let access_token = FcmAccessToken::read_from_file(token_file)
        .wrap_err("failed to read FCM access token")?;
    let endpoint = Url::parse(settings.fcm_endpoint()).wrap_err("invalid FCM endpoint")?;
    let messenger = FcmHttpMessenger::new(
        FcmHttpConfig {
            endpoint,
            project_id: project_id.to_owned(),
            timeout: settings.fcm_timeout(),
        },
        access_token,
    )
    .wrap_err("failed to configure FCM messenger")?;
    info!(send_url = %messenger.send_url(), "FCM messenger configured");
    Ok(Some(Arc::new(messenger)))
}
