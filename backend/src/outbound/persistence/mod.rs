//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Provides the [`DieselProfileRepository`] implementation of the
//! `ProfileRepository` port, backed by `diesel-async` connections pooled with
//! `bb8`.
//!
//! Row structs (`models.rs`) and the table definition (`schema.rs`) stay
//! private to this module; only domain types cross the boundary.
//!
//! # Example
//!
//! ```ignore
//! use prowd_backend::outbound::persistence::{DbPool, DieselProfileRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::for_url("postgres://localhost/prowd")).await?;
//! let repository = DieselProfileRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_profile_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_profile_repository::DieselProfileRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
