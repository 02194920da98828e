//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use pickup_backend::domain::DEFAULT_BACKFILL_BATCH_SIZE;
use pickup_backend::domain::ports::PushMessenger;
use pickup_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
///
/// Adapters left unset are replaced by stand-ins that report failure.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) messenger: Option<Arc<dyn PushMessenger>>,
    pub(crate) backfill_batch_size: usize,
}

impl ServerConfig {
    /// Configuration binding `bind_addr` with every adapter unset.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            messenger: None,
            backfill_batch_size: DEFAULT_BACKFILL_BATCH_SIZE,
        }
    }

    /// Attach a database pool for the order-history and user adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach the push messaging adapter.
    #[must_use]
    pub fn with_messenger(mut self, messenger: Arc<dyn PushMessenger>) -> Self {
        self.messenger = Some(messenger);
        self
    }

    /// Override the backfill batch size.
    #[must_use]
    pub fn with_backfill_batch_size(mut self, batch_size: usize) -> Self {
        self.backfill_batch_size = batch_size;
        self
    }
}
