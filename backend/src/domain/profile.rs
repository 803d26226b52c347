//! Profile entity: a named classification schema.
//!
//! A profile bundles a class, its filters, facets and attributes, plus a flag
//! telling downstream consumers whether subclasses are in scope. The class and
//! list fields are serialised structures owned by the client; the service
//! stores and returns them verbatim and never inspects their content.

use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Store-assigned surrogate identifier of a profile.
///
/// Identifiers are non-negative and strictly increasing in creation order.
/// They are never reassigned, including after soft deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProfileId(i64);

/// Reasons a raw value cannot become a [`ProfileId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileIdError {
    /// The input was not an integer.
    #[error("profile id must be an integer: {source}")]
    NotAnInteger {
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },
    /// The input was negative.
    #[error("profile id must not be negative, got {value}")]
    Negative {
        /// Rejected value.
        value: i64,
    },
}

impl ProfileId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Examples
    /// ```
    /// use prowd_backend::domain::ProfileId;
    ///
    /// assert_eq!(ProfileId::new(7).map(ProfileId::get), Ok(7));
    /// assert!(ProfileId::new(-1).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, ProfileIdError> {
        if value < 0 {
            return Err(ProfileIdError::Negative { value });
        }
        Ok(Self(value))
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for ProfileId {
    type Err = ProfileIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<i64>()
            .map_err(|source| ProfileIdError::NotAnInteger { source })?;
        Self::new(value)
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Caller-controlled content of a profile.
///
/// Every field is overwritten as a unit on update. `author` is optional because
/// not every client records attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    /// Free-text label; de-duplication key on creation.
    pub name: String,
    /// Optional attribution.
    pub author: Option<String>,
    /// Free-text description.
    pub description: String,
    /// Serialised name and code of the profiled class.
    pub class: String,
    /// Serialised list of filters.
    pub filters: String,
    /// Serialised list of facets.
    pub facets: String,
    /// Serialised list of attributes.
    pub attributes: String,
    /// Whether subclasses are in scope when the profile is applied.
    pub subclass: bool,
}

/// A persisted profile as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Store-assigned identifier.
    pub id: ProfileId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last overwrite (equal to `created_at` until then).
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion marker. Always `None` for profiles returned by reads.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Caller-controlled content.
    pub fields: ProfileFields,
}

/// Profile content as submitted by a caller.
///
/// `id` is whatever identifier the caller put in the payload, if any. It is
/// never used to address a row; it is carried only so update responses can
/// echo the submission back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSubmission {
    /// Identifier present in the submitted payload.
    pub id: Option<ProfileId>,
    /// Submitted content.
    pub fields: ProfileFields,
}

impl ProfileSubmission {
    /// Wrap content without a caller-supplied identifier.
    #[must_use]
    pub fn new(fields: ProfileFields) -> Self {
        Self { id: None, fields }
    }
}
