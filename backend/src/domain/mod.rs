//! Domain primitives, services and ports.
//!
//! Purpose: define the profile entity and the rules governing how profiles
//! are created, read, overwritten and soft-deleted, independent of HTTP and
//! of the storage engine.
//!
//! Public surface:
//! - [`Profile`], [`ProfileFields`], [`ProfileId`], [`ProfileSubmission`]:
//!   the entity and its identifier.
//! - [`ProfileService`]: implementation of the driving ports.
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failures.
//! - [`TraceId`]: request correlation identifier.

pub mod error;
pub mod ports;
pub mod profile;
pub mod profile_service;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::profile::{Profile, ProfileFields, ProfileId, ProfileIdError, ProfileSubmission};
pub use self::profile_service::{DEFAULT_OPERATION_TIMEOUT, ProfileService};
pub use self::trace_id::TraceId;
