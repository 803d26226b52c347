//! Profile API handlers.
//!
//! ```text
//! POST   /profile/new   {"name":"Painters","class":"{...}","facets":"[...]"}
//! GET    /profile
//! GET    /profile/{id}
//! PUT    /profile/{id}  {"name":"Painters","description":"..."}
//! DELETE /profile/{id}
//! ```
//!
//! Entity keys `ID`, `CreatedAt`, `UpdatedAt` and `DeletedAt` keep the casing
//! existing clients already send and parse.

use std::str::FromStr;

use actix_web::{delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::UpdateProfileRequest;
use crate::domain::{Error, Profile, ProfileFields, ProfileId, ProfileIdError, ProfileSubmission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Profile body accepted by create and update.
///
/// Absent strings decode as empty, absent `subclass` as `false` and absent
/// `author` as null. Unknown keys, including the store-managed timestamps,
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ProfileRequestBody {
    /// Caller-supplied identifier. Never used to address a row.
    #[serde(rename = "ID", alias = "id", skip_serializing_if = "Option::is_none")]
    #[schema(example = 3)]
    pub id: Option<i64>,
    #[schema(example = "Painters")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub description: String,
    /// Serialized name and code pair, stored verbatim.
    #[schema(example = r#"{"name":"painter","code":"Q1028181"}"#)]
    pub class: String,
    pub filters: String,
    pub facets: String,
    pub attributes: String,
    pub subclass: bool,
}

impl TryFrom<ProfileRequestBody> for ProfileSubmission {
    type Error = ProfileIdError;

    fn try_from(body: ProfileRequestBody) -> Result<Self, Self::Error> {
        let id = body.id.map(ProfileId::new).transpose()?;
        Ok(Self {
            id,
            fields: ProfileFields {
                name: body.name,
                author: body.author,
                description: body.description,
                class: body.class,
                filters: body.filters,
                facets: body.facets,
                attributes: body.attributes,
                subclass: body.subclass,
            },
        })
    }
}

/// Stored profile as returned by create, read and delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ProfileResponseBody {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "DeletedAt")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub name: String,
    pub author: Option<String>,
    pub description: String,
    pub class: String,
    pub filters: String,
    pub facets: String,
    pub attributes: String,
    pub subclass: bool,
}

impl From<Profile> for ProfileResponseBody {
    fn from(profile: Profile) -> Self {
        let Profile {
            id,
            created_at,
            updated_at,
            deleted_at,
            fields,
        } = profile;
        Self {
            id: id.get(),
            created_at,
            updated_at,
            deleted_at,
            name: fields.name,
            author: fields.author,
            description: fields.description,
            class: fields.class,
            filters: fields.filters,
            facets: fields.facets,
            attributes: fields.attributes,
            subclass: fields.subclass,
        }
    }
}

/// Submission echoed back by update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ProfileEchoBody {
    /// Identifier from the request body, if any; not the path id.
    #[serde(rename = "ID")]
    pub id: Option<i64>,
    pub name: String,
    pub author: Option<String>,
    pub description: String,
    pub class: String,
    pub filters: String,
    pub facets: String,
    pub attributes: String,
    pub subclass: bool,
}

impl From<ProfileSubmission> for ProfileEchoBody {
    fn from(submission: ProfileSubmission) -> Self {
        let ProfileSubmission { id, fields } = submission;
        Self {
            id: id.map(ProfileId::get),
            name: fields.name,
            author: fields.author,
            description: fields.description,
            class: fields.class,
            filters: fields.filters,
            facets: fields.facets,
            attributes: fields.attributes,
            subclass: fields.subclass,
        }
    }
}

fn parse_profile_id(raw: &str) -> Result<ProfileId, Error> {
    ProfileId::from_str(raw).map_err(|err| {
        Error::invalid_request(format!("invalid profile id {raw:?}: {err}"))
            .with_details(json!({ "field": "id", "code": "invalid_profile_id" }))
    })
}

fn submission_from_body(body: ProfileRequestBody) -> Result<ProfileSubmission, Error> {
    ProfileSubmission::try_from(body).map_err(|err| {
        Error::invalid_request(format!("invalid body ID: {err}"))
            .with_details(json!({ "field": "ID", "code": "invalid_profile_id" }))
    })
}

/// Create a profile unless a live profile already carries its name.
///
/// Returns whichever live profile holds the name afterwards, so repeating the
/// call is harmless.
#[utoipa::path(
    post,
    path = "/profile/new",
    request_body = ProfileRequestBody,
    responses(
        (status = 200, description = "Created or existing profile", body = ProfileResponseBody),
        (status = 400, description = "Malformed body", body = ErrorSchema),
        (status = 404, description = "Profile removed before it could be returned", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "createProfile"
)]
#[post("/profile/new")]
pub async fn create_profile(
    state: web::Data<HttpState>,
    payload: web::Json<ProfileRequestBody>,
) -> ApiResult<web::Json<ProfileResponseBody>> {
    let submission = submission_from_body(payload.into_inner())?;
    debug!(name = %submission.fields.name, "create profile requested");
    let profile = state.profiles.create(submission.fields).await?;
    Ok(web::Json(profile.into()))
}

/// List every live profile.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Live profiles", body = [ProfileResponseBody]),
        (status = 500, description = "Storage failure", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "listProfiles"
)]
#[get("/profile")]
pub async fn list_profiles(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ProfileResponseBody>>> {
    let profiles = state.profiles_query.list().await?;
    Ok(web::Json(profiles.into_iter().map(Into::into).collect()))
}

/// Fetch one live profile.
#[utoipa::path(
    get,
    path = "/profile/{id}",
    params(("id" = i64, Path, description = "Profile identifier")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponseBody),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "No live profile with this id", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "getProfile"
)]
#[get("/profile/{id}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileResponseBody>> {
    let id = parse_profile_id(&path.into_inner())?;
    let profile = state.profiles_query.get(id).await?;
    Ok(web::Json(profile.into()))
}

/// Overwrite every field of a live profile.
///
/// The response echoes the submitted body, including any `ID` it carried,
/// rather than the stored row.
#[utoipa::path(
    put,
    path = "/profile/{id}",
    params(("id" = i64, Path, description = "Profile identifier")),
    request_body = ProfileRequestBody,
    responses(
        (status = 200, description = "Submitted profile", body = ProfileEchoBody),
        (status = 400, description = "Malformed id or body", body = ErrorSchema),
        (status = 404, description = "No live profile with this id", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "updateProfile"
)]
#[put("/profile/{id}")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ProfileRequestBody>,
) -> ApiResult<web::Json<ProfileEchoBody>> {
    let id = parse_profile_id(&path.into_inner())?;
    let submission = submission_from_body(payload.into_inner())?;
    let echoed = state
        .profiles
        .update(UpdateProfileRequest { id, submission })
        .await?;
    Ok(web::Json(echoed.into()))
}

/// Soft-delete a live profile and return it as it was.
#[utoipa::path(
    delete,
    path = "/profile/{id}",
    params(("id" = i64, Path, description = "Profile identifier")),
    responses(
        (status = 200, description = "Profile before deletion", body = ProfileResponseBody),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "No live profile with this id", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "deleteProfile"
)]
#[delete("/profile/{id}")]
pub async fn delete_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileResponseBody>> {
    let id = parse_profile_id(&path.into_inner())?;
    let snapshot = state.profiles.delete(id).await?;
    Ok(web::Json(snapshot.into()))
}

#[cfg(test)]
#[path = "profiles_tests.rs"]
mod tests;
