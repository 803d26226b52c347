//! HTTP inbound adapter exposing the profile REST endpoints.

use actix_web::web;

pub mod error;
pub mod extractors;
pub mod health;
pub mod ping;
pub mod profiles;
pub mod schemas;
pub mod state;

pub use error::ApiResult;

/// Register the banner and profile routes with their extractor settings.
///
/// Callers provide `web::Data<HttpState>`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use prowd_backend::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(extractors::json_config())
        .service(ping::ping)
        .service(profiles::create_profile)
        .service(profiles::list_profiles)
        .service(profiles::get_profile)
        .service(profiles::update_profile)
        .service(profiles::delete_profile);
}
