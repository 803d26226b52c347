//! Outbound adapters implementing the profile repository port.
//!
//! - **persistence**: PostgreSQL via Diesel, used when a database URL is
//!   configured.
//! - **memory**: process-local store, used otherwise and in tests.
//!
//! Adapters translate between domain types and storage representations and
//! contain no business logic.

pub mod memory;
pub mod persistence;

pub use memory::InMemoryProfileRepository;
