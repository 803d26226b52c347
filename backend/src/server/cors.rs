//! Cross-origin policy for the browser-based profile editor.

use actix_cors::Cors;
use actix_web::http::{Method, header};

/// Preflight cache lifetime, twelve hours.
const MAX_AGE_SECS: usize = 12 * 60 * 60;

/// Any origin, the profile verbs and the editor's headers, no credentials.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
        ])
        .allowed_headers([
            header::ORIGIN,
            header::CONTENT_LENGTH,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
        .max_age(MAX_AGE_SECS)
}
