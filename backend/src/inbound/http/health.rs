//! Liveness and readiness probes.
//!
//! The server moves through three phases: `starting` until the listener is
//! bound, `serving` while it accepts traffic, and `draining` once a shutdown
//! signal arrives. Readiness holds only while serving; liveness fails only
//! while draining.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

/// Lifecycle phase reported by the probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Listener not bound yet.
    Starting,
    /// Accepting traffic.
    Serving,
    /// Shutdown requested; in-flight requests are finishing.
    Draining,
}

impl Phase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Serving,
            _ => Self::Draining,
        }
    }
}

/// Probe response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeStatus {
    /// Current lifecycle phase.
    pub phase: Phase,
}

/// Lifecycle phase shared between `main`, the server builder and the probes.
#[derive(Debug, Default)]
pub struct HealthState {
    phase: AtomicU8,
}

impl HealthState {
    /// State in the `starting` phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `serving` unless a drain has already begun.
    pub fn mark_serving(&self) {
        let moved = self.phase.compare_exchange(
            Phase::Starting as u8,
            Phase::Serving as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        if let Err(current) = moved {
            debug!(phase = ?Phase::from_u8(current), "serving transition skipped");
        }
    }

    /// Enter `draining`; terminal.
    pub fn mark_draining(&self) {
        self.phase.store(Phase::Draining as u8, Ordering::Release);
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }
}

fn probe(phase: Phase, healthy: bool) -> HttpResponse {
    let mut builder = if healthy {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(ProbeStatus { phase })
}

/// Readiness probe: 200 while serving.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Accepting profile traffic", body = ProbeStatus),
        (status = 503, description = "Starting up or draining", body = ProbeStatus)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let phase = state.phase();
    probe(phase, phase == Phase::Serving)
}

/// Liveness probe: 200 until the drain starts.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Process is alive", body = ProbeStatus),
        (status = 503, description = "Draining before exit", body = ProbeStatus)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    let phase = state.phase();
    probe(phase, phase != Phase::Draining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn call(state: &web::Data<HealthState>, uri: &str) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(state.clone())
                .service(ready)
                .service(live),
        )
        .await;
        let request = actix_test::TestRequest::get().uri(uri).to_request();
        let res = actix_test::call_service(&app, request).await;
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
        let status = res.status();
        (status, actix_test::read_body_json(res).await)
    }

    #[rstest]
    #[case::starting(None, StatusCode::SERVICE_UNAVAILABLE, StatusCode::OK, "starting")]
    #[case::serving(Some(false), StatusCode::OK, StatusCode::OK, "serving")]
    #[case::draining(Some(true), StatusCode::SERVICE_UNAVAILABLE, StatusCode::SERVICE_UNAVAILABLE, "draining")]
    #[actix_web::test]
    async fn probes_follow_lifecycle(
        #[case] transition: Option<bool>,
        #[case] ready_status: StatusCode,
        #[case] live_status: StatusCode,
        #[case] phase: &str,
    ) {
        let state = web::Data::new(HealthState::new());
        if let Some(drain) = transition {
            state.mark_serving();
            if drain {
                state.mark_draining();
            }
        }

        let (status, body) = call(&state, "/health/ready").await;
        assert_eq!(status, ready_status);
        assert_eq!(body, json!({ "phase": phase }));

        let (status, _) = call(&state, "/health/live").await;
        assert_eq!(status, live_status);
    }

    #[rstest]
    fn drain_is_not_undone_by_late_bind() {
        let state = HealthState::new();
        state.mark_draining();
        state.mark_serving();
        assert_eq!(state.phase(), Phase::Draining);
    }
}
