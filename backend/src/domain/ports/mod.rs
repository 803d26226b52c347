//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`ProfileCommand`], [`ProfileQuery`]) are what inbound
//! adapters call; the driven port ([`ProfileRepository`]) is what outbound
//! adapters implement.

mod macros;
pub(crate) use macros::define_port_error;

mod profile_command;
mod profile_query;
mod profile_repository;

#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::{ProfileCommand, UpdateProfileRequest};
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::ProfileQuery;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
