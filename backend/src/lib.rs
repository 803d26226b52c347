//! ProWD profile service.
//!
//! Layout follows ports and adapters: [`domain`] owns the profile rules and
//! port traits, [`outbound`] implements storage, [`inbound`] exposes HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
