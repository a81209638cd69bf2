//! HTTP endpoints.
//!
//! - `/`           : liveness banner
//! - `/healthz`    : liveness
//! - `/prometheus` : one pull, Prometheus text format (`/metrics` is an alias).
//!   A pull cut by the server timeout still answers, with `up 0`.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::time::{timeout, Instant};

use crate::app_state::AppState;
use crate::obs::exposition::{TextEncoder, CONTENT_TYPE};

pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "EXPORTER ALIVE")
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let budget = state.cfg().server_timeout();
    let mut encoder = TextEncoder::new();

    let outcome = timeout(budget, state.collector().collect(&mut encoder)).await;
    match outcome {
        Ok(report) => state.metrics().observe(&report),
        // the dropped pull has already pushed `up 0` into the encoder
        Err(_) => {
            state.metrics().observe_timeout(started.elapsed());
            tracing::warn!(budget_ms = budget.as_millis() as u64, "scrape exceeded server timeout");
        }
    }

    let mut body = encoder.finish();
    state.metrics().render(&mut body);

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}
