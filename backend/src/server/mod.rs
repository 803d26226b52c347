//! Server construction and middleware wiring.

mod config;
mod cors;
#[cfg(feature = "metrics")]
mod metrics;

pub use config::ServerConfig;
#[cfg(feature = "metrics")]
pub use metrics::prometheus_exporter;
#[cfg(feature = "metrics")]
use metrics::MetricsLayer;

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use prowd_backend::Trace;
#[cfg(debug_assertions)]
use prowd_backend::doc::ApiDoc;
use prowd_backend::domain::ProfileService;
use prowd_backend::domain::ports::ProfileRepository;
use prowd_backend::inbound::http::configure;
use prowd_backend::inbound::http::health::{HealthState, live, ready};
use prowd_backend::inbound::http::state::HttpState;
use prowd_backend::outbound::InMemoryProfileRepository;
use prowd_backend::outbound::persistence::DieselProfileRepository;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn service_state<R>(repository: R, config: &ServerConfig) -> HttpState
where
    R: ProfileRepository + 'static,
{
    let service = Arc::new(
        ProfileService::new(Arc::new(repository)).with_operation_timeout(config.operation_timeout),
    );
    HttpState::new(service.clone(), service)
}

/// Pick the profile store: Diesel when a pool is configured, memory otherwise.
fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => {
            info!("profiles persisted in PostgreSQL");
            service_state(DieselProfileRepository::new(pool.clone()), config)
        }
        None => {
            warn!("no database configured; profiles are kept in memory and lost on exit");
            service_state(InMemoryProfileRepository::new(), config)
        }
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(cors::cors_policy())
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the Actix HTTP server.
///
/// The health state enters `serving` once the listener is bound. OS signal
/// handling is left to the caller, which stops the server through its handle.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let bind_addr = config.bind_addr;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from(config.prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone());
        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());
        app
    })
    .disable_signals()
    .bind(bind_addr)?
    .run();

    info!(addr = %bind_addr, "listening");
    health_state.mark_serving();
    Ok(server)
}
