//! Prometheus request metrics, compiled in with the `metrics` feature.
//!
//! [`MetricsLayer`] records per-route request counts and latencies under the
//! `prowd` namespace and serves them at `/metrics`. When no exporter is
//! configured the layer only boxes the response body, so the app type is the
//! same either way.

use std::sync::Arc;

use actix_service::boxed::{self, BoxService};
use actix_service::{Service, ServiceExt as _, Transform};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use color_eyre::eyre::eyre;
use futures_util::future::LocalBoxFuture;
use prometheus::Registry;

/// Metric name prefix.
pub(crate) const METRICS_NAMESPACE: &str = "prowd";
/// Scrape endpoint served by the exporter.
pub(crate) const METRICS_PATH: &str = "/metrics";

/// Build the exporter over a fresh registry.
///
/// # Errors
/// Fails when the default HTTP collectors cannot be registered.
pub(crate) fn prometheus_exporter() -> color_eyre::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(METRICS_NAMESPACE)
        .registry(Registry::new())
        .endpoint(METRICS_PATH)
        .build()
        .map_err(|err| eyre!("failed to configure Prometheus metrics: {err}"))
}

/// Middleware that exports request metrics when an exporter is present.
#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Exporting(Arc<PrometheusMetrics>),
    Off,
}

impl From<Option<PrometheusMetrics>> for MetricsLayer {
    fn from(exporter: Option<PrometheusMetrics>) -> Self {
        exporter.map_or(Self::Off, |metrics| Self::Exporting(Arc::new(metrics)))
    }
}

type BoxedApp = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxedApp;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self {
            Self::Exporting(metrics) => {
                let pending = Compat::new((**metrics).clone()).new_transform(service);
                Box::pin(async move { Ok(boxed::service(pending.await?)) })
            }
            Self::Off => {
                let boxed_body = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
                Box::pin(async move { Ok(boxed::service(boxed_body)) })
            }
        }
    }
}
