//! Extractor configuration shared by every profile route.

use actix_web::web;
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// JSON extractor settings.
///
/// Bodies are parsed regardless of `Content-Type`, and decoding failures are
/// reported as `invalid_request` errors in the standard error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .content_type_required(false)
        .error_handler(|err, _req| {
            let reason = err.to_string();
            debug!(%reason, "rejected request body");
            Error::invalid_request("request body is not a valid profile")
                .with_details(json!({ "code": "malformed_body", "reason": reason }))
                .into()
        })
}
