//! Root endpoint identifying the service.

use actix_web::{get, web};

/// Banner returned by `GET /`.
pub const PING_MESSAGE: &str = "ProWD prototype database API";

/// Identify the service.
#[utoipa::path(
    get,
    path = "/",
    tags = ["health"],
    responses((status = 200, description = "Service banner", body = String))
)]
#[get("/")]
pub async fn ping() -> web::Json<&'static str> {
    web::Json(PING_MESSAGE)
}
