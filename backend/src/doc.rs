//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every handler annotated with `#[utoipa::path]` plus the
//! error schema wrappers. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::health::{Phase, ProbeStatus};
use crate::inbound::http::profiles::{ProfileEchoBody, ProfileRequestBody, ProfileResponseBody};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ProWD prototype database API",
        description = "Storage of classification profiles: name-keyed creation, full-overwrite updates and soft deletion."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::ping::ping,
        crate::inbound::http::profiles::create_profile,
        crate::inbound::http::profiles::list_profiles,
        crate::inbound::http::profiles::get_profile,
        crate::inbound::http::profiles::update_profile,
        crate::inbound::http::profiles::delete_profile,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ProfileRequestBody,
        ProfileResponseBody,
        ProfileEchoBody,
        ErrorSchema,
        ErrorCodeSchema,
        ProbeStatus,
        Phase
    )),
    tags(
        (name = "profiles", description = "Profile storage and retrieval"),
        (name = "health", description = "Service banner and probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(schema: &RefOr<Schema>) -> Vec<String> {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_uses_wire_field_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let fields = object_fields(schemas.get("Error").expect("Error schema"));

        for field in ["code", "message", "traceId", "details"] {
            assert!(fields.iter().any(|f| f == field), "missing {field}");
        }
    }

    #[rstest]
    fn profile_response_keeps_legacy_keys() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let fields = object_fields(schemas.get("ProfileResponseBody").expect("profile schema"));

        for field in ["ID", "CreatedAt", "UpdatedAt", "DeletedAt", "name", "subclass"] {
            assert!(fields.iter().any(|f| f == field), "missing {field}");
        }
    }

    #[rstest]
    #[case("/profile/new")]
    #[case("/profile")]
    #[case("/profile/{id}")]
    #[case("/health/ready")]
    fn routes_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
