//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PROWD_*` environment variables and optional
//! config files. Platforms that inject a bare `DATABASE_URL` or `PORT` are
//! honoured when the prefixed variable is unset.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

use crate::domain::DEFAULT_OPERATION_TIMEOUT;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_MIN_IDLE: u32 = 2;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DATABASE_URL_FALLBACK_ENV: &str = "DATABASE_URL";
const PORT_FALLBACK_ENV: &str = "PORT";

/// Configuration values for the profile service.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PROWD")]
pub struct ServiceSettings {
    /// PostgreSQL connection string. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Listen address.
    pub host: Option<IpAddr>,
    /// Listen port.
    pub port: Option<u16>,
    /// Maximum pooled connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections kept open.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout_secs: Option<u64>,
    /// Seconds allowed for a single profile operation.
    pub operation_timeout_secs: Option<u64>,
    /// Leave the schema alone at startup instead of applying embedded
    /// migrations.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl ServiceSettings {
    /// Fill unset fields from the unprefixed platform variables.
    ///
    /// # Examples
    /// ```
    /// use mockable::MockEnv;
    /// use prowd_backend::settings::ServiceSettings;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|key| match key {
    ///     "PORT" => Some("5000".to_owned()),
    ///     _ => None,
    /// });
    /// let settings = ServiceSettings::default().with_platform_fallbacks(&env);
    /// assert_eq!(settings.port(), 5000);
    /// ```
    #[must_use]
    pub fn with_platform_fallbacks(mut self, env: &impl Env) -> Self {
        if self.database_url.is_none() {
            self.database_url = env
                .string(DATABASE_URL_FALLBACK_ENV)
                .filter(|url| !url.trim().is_empty());
        }
        if self.port.is_none() {
            self.port = env
                .string(PORT_FALLBACK_ENV)
                .and_then(|raw| match raw.trim().parse::<u16>() {
                    Ok(port) => Some(port),
                    Err(error) => {
                        warn!(%error, value = %raw, "ignoring unparsable PORT");
                        None
                    }
                });
        }
        self
    }

    /// Configured database URL, if any.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host.unwrap_or(DEFAULT_HOST), self.port())
    }

    /// Listen port, defaulting to 8080.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Per-operation timeout for the profile service.
    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout_secs
            .map_or(DEFAULT_OPERATION_TIMEOUT, Duration::from_secs)
    }

    /// Whether embedded migrations run before serving.
    pub fn run_migrations(&self) -> bool {
        !self.skip_migrations
    }

    /// Pool settings for `database_url`.
    ///
    /// A configured pool size of zero is raised to one connection.
    pub fn pool_config(&self, database_url: &str) -> PoolConfig {
        let max_size = match self.pool_max_size {
            Some(0) => {
                warn!("pool_max_size must be at least 1; using 1");
                1
            }
            Some(size) => size,
            None => DEFAULT_POOL_MAX_SIZE,
        };
        PoolConfig {
            database_url: database_url.to_owned(),
            max_size,
            min_idle: self.pool_min_idle.unwrap_or(DEFAULT_POOL_MIN_IDLE),
            checkout_timeout: Duration::from_secs(
                self.connection_timeout_secs
                    .unwrap_or(DEFAULT_CONNECTION_TIMEOUT_SECS),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for service configuration parsing.

    use super::*;
    use std::collections::HashMap;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use mockable::{DefaultEnv, MockEnv};
    use rstest::rstest;

    const PREFIXED: [&str; 8] = [
        "PROWD_DATABASE_URL",
        "PROWD_HOST",
        "PROWD_PORT",
        "PROWD_POOL_MAX_SIZE",
        "PROWD_POOL_MIN_IDLE",
        "PROWD_CONNECTION_TIMEOUT_SECS",
        "PROWD_OPERATION_TIMEOUT_SECS",
        "PROWD_SKIP_MIGRATIONS",
    ];

    fn load_from_empty_args() -> ServiceSettings {
        ServiceSettings::load_from_iter([OsString::from("prowd-backend")])
            .expect("config should load")
    }

    fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .returning(move |key| vars.get(key).cloned());
        env
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(PREFIXED.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert!(settings.database_url().is_none());
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert_eq!(settings.operation_timeout(), DEFAULT_OPERATION_TIMEOUT);
        assert!(settings.run_migrations());

        let pool = settings.pool_config("postgres://localhost/prowd");
        assert_eq!(pool.max_size, 10);
    }

    #[rstest]
    fn zero_pool_size_is_raised_to_one() {
        let settings = ServiceSettings {
            pool_max_size: Some(0),
            ..ServiceSettings::default()
        };

        let pool = settings.pool_config("postgres://localhost/prowd");
        assert_eq!(pool.max_size, 1);
        assert_eq!(pool.min_idle, DEFAULT_POOL_MIN_IDLE);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = PREFIXED.map(|key| (key, None::<String>));
        vars[0].1 = Some("postgres://db/prowd".to_owned());
        vars[2].1 = Some("9000".to_owned());
        vars[3].1 = Some("4".to_owned());
        vars[6].1 = Some("3".to_owned());
        vars[7].1 = Some("true".to_owned());
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url(), Some("postgres://db/prowd"));
        assert_eq!(settings.port(), 9000);
        assert_eq!(settings.operation_timeout(), Duration::from_secs(3));
        assert!(!settings.run_migrations());
        assert_eq!(
            settings.pool_config("postgres://db/prowd").max_size,
            4
        );
    }

    #[rstest]
    fn platform_variables_fill_unset_fields() {
        let env = mock_env(&[("DATABASE_URL", "postgres://heroku/db"), ("PORT", "5001")]);

        let settings = ServiceSettings::default().with_platform_fallbacks(&env);
        assert_eq!(settings.database_url(), Some("postgres://heroku/db"));
        assert_eq!(settings.port(), 5001);
    }

    #[rstest]
    fn process_environment_fills_unset_fields() {
        let _guard = lock_env([
            ("DATABASE_URL", Some("postgres://platform/prowd".to_owned())),
            ("PORT", Some("5002".to_owned())),
        ]);

        let settings = ServiceSettings::default().with_platform_fallbacks(&DefaultEnv::new());
        assert_eq!(settings.database_url(), Some("postgres://platform/prowd"));
        assert_eq!(settings.port(), 5002);
    }

    #[rstest]
    fn prefixed_values_win_over_platform_variables() {
        let env = mock_env(&[("DATABASE_URL", "postgres://heroku/db"), ("PORT", "5001")]);
        let settings = ServiceSettings {
            database_url: Some("postgres://local/prowd".to_owned()),
            port: Some(7000),
            ..ServiceSettings::default()
        }
        .with_platform_fallbacks(&env);

        assert_eq!(settings.database_url(), Some("postgres://local/prowd"));
        assert_eq!(settings.port(), 7000);
    }

    #[rstest]
    #[case("", "not-a-port")]
    #[case("   ", "70000")]
    fn blank_url_and_bad_port_are_ignored(#[case] url: &str, #[case] port: &str) {
        let env = mock_env(&[("DATABASE_URL", url), ("PORT", port)]);

        let settings = ServiceSettings::default().with_platform_fallbacks(&env);
        assert!(settings.database_url().is_none());
        assert_eq!(settings.port(), 8080);
    }
}
