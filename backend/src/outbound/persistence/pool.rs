//! Process-wide pool of async PostgreSQL connections.
//!
//! Built once in `main` and cloned into the profile repository; every clone
//! shares the same `bb8` pool.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::debug;

use crate::domain::ports::define_port_error;

define_port_error! {
    /// Failures raised by [`DbPool`].
    pub enum PoolError {
        /// The pool could not be created from its configuration.
        Build { message: String } => "could not create connection pool: {message}",
        /// No connection was handed out before the checkout timeout.
        Checkout { message: String } => "connection checkout failed: {message}",
    }
}

impl PoolError {
    /// Underlying cause reported by `bb8`.
    pub fn message(&self) -> &str {
        match self {
            Self::Build { message } | Self::Checkout { message } => message,
        }
    }
}

/// Sizing and checkout settings for a [`DbPool`].
///
/// ```
/// use std::time::Duration;
/// use prowd_backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig {
///     max_size: 4,
///     ..PoolConfig::for_url("postgres://prowd@localhost/prowd")
/// };
/// assert_eq!(config.checkout_timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Upper bound on open connections.
    pub max_size: u32,
    /// Connections kept open while idle.
    pub min_idle: u32,
    /// How long a handler waits for a free connection.
    pub checkout_timeout: Duration,
}

impl PoolConfig {
    /// Ten connections, two idle, thirty second checkout.
    pub fn for_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: 2,
            checkout_timeout: Duration::from_secs(30),
        }
    }
}

/// Shared handle to the connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open a pool according to `config`.
    ///
    /// # Errors
    ///
    /// [`PoolError::Build`] when `bb8` rejects the configuration or the
    /// initial idle connections cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig {
            database_url,
            max_size,
            min_idle,
            checkout_timeout,
        } = config;
        let max_size = max_size.max(1);
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let inner = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(min_idle.min(max_size)))
            .connection_timeout(checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        debug!(max_size, min_idle, "connection pool ready");
        Ok(Self { inner })
    }

    /// Borrow a connection for one statement.
    ///
    /// # Errors
    ///
    /// [`PoolError::Checkout`] when the checkout timeout elapses or a new
    /// connection cannot be opened.
    pub async fn checkout(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner.get().await.map_err(|err| {
            let state = self.inner.state();
            debug!(
                connections = state.connections,
                idle = state.idle_connections,
                "connection checkout failed"
            );
            PoolError::checkout(err.to_string())
        })
    }
}
