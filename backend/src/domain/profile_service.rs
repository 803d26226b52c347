//! Profile domain service.
//!
//! Implements the [`ProfileCommand`] and [`ProfileQuery`] driving ports on top
//! of a [`ProfileRepository`].
//!
//! Creation is keyed by name: a candidate whose name already belongs to a live
//! profile is dropped and the existing profile is returned unchanged (first
//! writer wins). The lookup and the insert are separate statements, so two
//! concurrent creations with the same name can both insert. That race is
//! accepted; reads by name then resolve to the lowest id.
//!
//! Every operation is bounded by a timeout, except that a create never
//! abandons an insert it has issued.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ProfileCommand, ProfileQuery, ProfileRepository, ProfileRepositoryError, UpdateProfileRequest,
};
use crate::domain::{Error, Profile, ProfileFields, ProfileId, ProfileSubmission};

/// Default upper bound for a single profile operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Profile service implementing the driving ports.
#[derive(Clone)]
pub struct ProfileService<R> {
    repository: Arc<R>,
    operation_timeout: Duration,
}

impl<R> ProfileService<R> {
    /// Create a service over `repository` using [`DEFAULT_OPERATION_TIMEOUT`].
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Override the per-operation timeout.
    #[must_use]
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }
}

impl<R> ProfileService<R>
where
    R: ProfileRepository,
{
    fn map_repository_error(error: ProfileRepositoryError) -> Error {
        match error {
            ProfileRepositoryError::Connection { message } => {
                Error::internal(format!("profile repository unavailable: {message}"))
            }
            ProfileRepositoryError::Query { message } => {
                Error::internal(format!("profile repository error: {message}"))
            }
        }
    }

    fn not_found(id: ProfileId) -> Error {
        Error::not_found(format!("profile {id} not found")).with_details(json!({
            "id": id.get(),
            "code": "profile_not_found",
        }))
    }

    /// Run `operation`, failing it once the configured timeout elapses.
    ///
    /// Expiry drops the in-flight future, which releases any pooled
    /// connection it held.
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = u64::try_from(self.operation_timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(operation, timeout_ms, "profile operation timed out");
                Err(Error::internal(format!("profile {operation} timed out")).with_details(
                    json!({ "operation": operation, "timeoutMs": timeout_ms }),
                ))
            }
        }
    }

    async fn lookup_by_name(&self, name: &str) -> Result<Option<Profile>, Error> {
        self.repository
            .find_live_by_name(name)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Name-keyed creation.
    ///
    /// The lookups are bounded by the operation timeout; the insert is not,
    /// so a row that reaches the store is always reported to the caller. If
    /// the confirming lookup fails after a successful insert, the inserted row
    /// is returned instead of an error.
    async fn create_by_name(&self, fields: ProfileFields) -> Result<Profile, Error> {
        let existing = self
            .bounded("create", self.lookup_by_name(&fields.name))
            .await?;

        let inserted = match existing {
            None => {
                let inserted = self
                    .repository
                    .insert(&fields)
                    .await
                    .map_err(Self::map_repository_error)?;
                info!(profile_id = %inserted.id, name = %fields.name, "profile created");
                Some(inserted)
            }
            Some(profile) => {
                debug!(
                    profile_id = %profile.id,
                    name = %fields.name,
                    "live profile with this name exists; candidate discarded"
                );
                None
            }
        };

        let confirmed = self
            .bounded("create", self.lookup_by_name(&fields.name))
            .await;
        match (confirmed, inserted) {
            (Ok(Some(profile)), _) => Ok(profile),
            (Ok(None), _) => Err(Error::not_found(format!(
                "profile named {:?} was removed before it could be returned",
                fields.name
            ))),
            (Err(error), Some(inserted)) => {
                warn!(
                    profile_id = %inserted.id,
                    cause = error.message(),
                    "lookup after insert failed; returning inserted profile"
                );
                Ok(inserted)
            }
            (Err(error), None) => Err(error),
        }
    }
}

#[async_trait]
impl<R> ProfileCommand for ProfileService<R>
where
    R: ProfileRepository,
{
    async fn create(&self, fields: ProfileFields) -> Result<Profile, Error> {
        self.create_by_name(fields).await
    }

    async fn update(&self, request: UpdateProfileRequest) -> Result<ProfileSubmission, Error> {
        let UpdateProfileRequest { id, submission } = request;
        self.bounded("update", async {
            let stored = self
                .repository
                .overwrite(id, &submission.fields)
                .await
                .map_err(Self::map_repository_error)?
                .ok_or_else(|| Self::not_found(id))?;
            info!(profile_id = %stored.id, updated_at = %stored.updated_at, "profile overwritten");
            Ok(())
        })
        .await?;
        Ok(submission)
    }

    async fn delete(&self, id: ProfileId) -> Result<Profile, Error> {
        self.bounded("delete", async {
            let snapshot = self
                .repository
                .soft_delete(id)
                .await
                .map_err(Self::map_repository_error)?
                .ok_or_else(|| Self::not_found(id))?;
            info!(profile_id = %id, "profile soft-deleted");
            Ok(snapshot)
        })
        .await
    }
}

#[async_trait]
impl<R> ProfileQuery for ProfileService<R>
where
    R: ProfileRepository,
{
    async fn list(&self) -> Result<Vec<Profile>, Error> {
        self.bounded("list", async {
            self.repository
                .list_live()
                .await
                .map_err(Self::map_repository_error)
        })
        .await
    }

    async fn get(&self, id: ProfileId) -> Result<Profile, Error> {
        self.bounded("get", async {
            self.repository
                .find_live_by_id(id)
                .await
                .map_err(Self::map_repository_error)?
                .ok_or_else(|| Self::not_found(id))
        })
        .await
    }
}

#[cfg(test)]
#[path = "profile_service_tests.rs"]
mod tests;
