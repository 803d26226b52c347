//! HTTP server configuration object.

use std::net::SocketAddr;

use std::time::Duration;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use prowd_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) operation_timeout: Duration,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Configuration binding `bind_addr` with the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, operation_timeout: Duration) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            operation_timeout,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Persist profiles through `pool` instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Export request metrics through `prometheus`; `None` leaves them off.
    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
