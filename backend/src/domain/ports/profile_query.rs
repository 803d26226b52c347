//! Driving port for profile reads.

use async_trait::async_trait;

use crate::domain::{Error, Profile, ProfileId};

/// Domain use-case port for reading live profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// List every live profile. An empty store yields an empty list.
    async fn list(&self) -> Result<Vec<Profile>, Error>;

    /// Fetch one live profile, failing with `NotFound` when it is absent or
    /// soft-deleted.
    async fn get(&self, id: ProfileId) -> Result<Profile, Error>;
}
