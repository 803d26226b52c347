//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; the
//! wrappers here mirror their wire shape for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No live profile matched.
    #[schema(rename = "not_found")]
    NotFound,
    /// Storage or other unexpected failure.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "profile 7 not found")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details.
    details: Option<serde_json::Value>,
}
