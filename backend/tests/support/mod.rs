//! Shared helpers for backend integration tests.

pub mod cluster_skip;
pub mod pg_embed;

pub use cluster_skip::{embedded_postgres_enabled, handle_cluster_setup_failure};
pub use pg_embed::{reset_database, test_cluster};
