//! Driven port for profile persistence.
//!
//! The [`ProfileRepository`] trait exposes the storage primitives the profile
//! operations are composed from. Every read filters out soft-deleted rows;
//! adapters never physically remove a row.

use async_trait::async_trait;

use crate::domain::{Profile, ProfileFields, ProfileId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile repository query failed: {message}",
    }
}

/// Port for profile storage and retrieval.
///
/// Each method is a single statement against the backing store. Composite
/// behaviour (such as name-keyed creation) lives in the domain service, which
/// does not wrap the calls in a transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find the live profile carrying `name`.
    ///
    /// When several live profiles share the name, the one with the lowest id
    /// is returned.
    async fn find_live_by_name(&self, name: &str) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Find the live profile with `id`.
    async fn find_live_by_id(&self, id: ProfileId)
    -> Result<Option<Profile>, ProfileRepositoryError>;

    /// List every live profile in ascending id order.
    async fn list_live(&self) -> Result<Vec<Profile>, ProfileRepositoryError>;

    /// Insert a new row, letting the store assign the id and timestamps.
    async fn insert(&self, fields: &ProfileFields) -> Result<Profile, ProfileRepositoryError>;

    /// Overwrite every field of the live row `id` and advance `updated_at`.
    ///
    /// Returns the row as persisted, or `None` when `id` does not resolve to a
    /// live row.
    async fn overwrite(
        &self,
        id: ProfileId,
        fields: &ProfileFields,
    ) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Mark the live row `id` as deleted.
    ///
    /// Returns the row as it was immediately before deletion (so `deleted_at`
    /// is `None`), or `None` when `id` does not resolve to a live row.
    async fn soft_delete(&self, id: ProfileId) -> Result<Option<Profile>, ProfileRepositoryError>;
}
