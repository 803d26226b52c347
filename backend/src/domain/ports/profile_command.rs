//! Driving port for profile mutations.
//!
//! Inbound adapters call this port to create, overwrite, and delete profiles
//! without depending on persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, Profile, ProfileFields, ProfileId, ProfileSubmission};

/// Request to overwrite the profile addressed by `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    /// Identifier of the row to overwrite, taken from the request path.
    pub id: ProfileId,
    /// Replacement content as submitted by the caller.
    pub submission: ProfileSubmission,
}

/// Domain use-case port for profile mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Create a profile unless a live profile with the same name exists.
    ///
    /// Returns the live profile carrying the name afterwards: the freshly
    /// inserted row, or the pre-existing one left untouched.
    async fn create(&self, fields: ProfileFields) -> Result<Profile, Error>;

    /// Overwrite every field of a live profile.
    ///
    /// Returns the caller's submission unchanged rather than the stored row.
    async fn update(&self, request: UpdateProfileRequest) -> Result<ProfileSubmission, Error>;

    /// Soft delete a live profile and return its pre-deletion snapshot.
    async fn delete(&self, id: ProfileId) -> Result<Profile, Error>;
}
