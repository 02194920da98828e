//! Server configuration loaded via OrthoConfig.
//!
//! Values come from `PICKUP_*` environment variables, CLI flags and config
//! files. Unset optional values fall back to the defaults in the accessors.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_BACKFILL_BATCH_SIZE;
use crate::outbound::fcm::DEFAULT_FCM_ENDPOINT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_FCM_TIMEOUT_SECS: u64 = 10;

/// Runtime settings for the pickup backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PICKUP")]
pub struct AppSettings {
    /// Socket address the HTTP server binds.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Store calls fail when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply embedded migrations on startup.
    pub run_migrations: Option<bool>,
    /// Firebase project receiving push sends.
    pub fcm_project_id: Option<String>,
    /// File holding the OAuth2 bearer token for FCM.
    pub fcm_access_token_file: Option<PathBuf>,
    /// FCM API root override, mainly for tests.
    pub fcm_endpoint: Option<String>,
    /// Per-request FCM timeout in seconds.
    pub fcm_timeout_secs: Option<u64>,
    /// Records fetched and committed per backfill batch.
    pub backfill_batch_size: Option<usize>,
}

impl AppSettings {
    /// Bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Pool size, defaulting to ten connections.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Whether to apply embedded migrations, defaulting to `true`.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// FCM API root.
    pub fn fcm_endpoint(&self) -> &str {
        self.fcm_endpoint.as_deref().unwrap_or(DEFAULT_FCM_ENDPOINT)
    }

    /// FCM request timeout.
    pub fn fcm_timeout(&self) -> Duration {
        Duration::from_secs(self.fcm_timeout_secs.unwrap_or(DEFAULT_FCM_TIMEOUT_SECS))
    }

    /// Backfill batch size, defaulting to 500.
    pub fn backfill_batch_size(&self) -> usize {
        self.backfill_batch_size
            .unwrap_or(DEFAULT_BACKFILL_BATCH_SIZE)
    }

    /// Project id and token file, when both are configured.
    pub fn fcm_credentials(&self) -> Option<(&str, &PathBuf)> {
        let project = self
            .fcm_project_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())?;
        let token_file = self.fcm_access_token_file.as_ref()?;
        Some((project, token_file))
    }
}
