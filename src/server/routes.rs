//! Request dispatch and probe handlers
//!
//! Dispatch is an exact string match on the request target (path plus
//! query), any method:
//! - `/health` - Liveness: `{"status":"healthy","timestamp":...}`
//! - `/ready` - Readiness: `{"status":"ready"}`
//! - `/info` - Runtime snapshot as JSON
//! - anything else - HTML status page, including `/health?x=1`
//!
//! Every target answers 200 OK.

use crate::config::Config;
use crate::runtime::{format_timestamp, MemoryUsage, RuntimeProbe};
use crate::server::page;
use axum::{
    extract::State,
    http::Uri,
    response::{Html, IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct ProbeState {
    config: Arc<Config>,
    probe: Arc<RuntimeProbe>,
}

impl ProbeState {
    pub fn new(config: Arc<Config>, probe: Arc<RuntimeProbe>) -> Self {
        Self { config, probe }
    }
}

/// Liveness response body
#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub timestamp: String,
}

/// Readiness response body
#[derive(Debug, Serialize)]
pub struct ReadyBody {
    pub status: &'static str,
}

/// Introspection response body
#[derive(Debug, Serialize)]
pub struct InfoBody {
    pub app: String,
    pub version: String,
    pub hostname: String,
    pub platform: &'static str,
    /// Seconds since process start
    pub uptime: f64,
    pub memory: MemoryUsage,
    pub timestamp: String,
}

pub fn health_body(probe: &RuntimeProbe) -> HealthBody {
    HealthBody {
        status: "healthy",
        timestamp: format_timestamp(probe.now()),
    }
}

pub fn ready_body() -> ReadyBody {
    ReadyBody { status: "ready" }
}

pub fn info_body(config: &Config, probe: &RuntimeProbe) -> InfoBody {
    let snapshot = probe.snapshot();
    InfoBody {
        app: config.app_name.clone(),
        version: config.app_version.clone(),
        timestamp: snapshot.timestamp_iso(),
        hostname: snapshot.hostname,
        platform: snapshot.platform,
        uptime: snapshot.uptime.as_secs_f64(),
        memory: snapshot.memory,
    }
}

/// Handler selected for a request target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    Ready,
    Info,
    StatusPage,
}

impl Endpoint {
    /// First exact match wins; no prefix, case or query normalization
    pub fn resolve(target: &str) -> Self {
        match target {
            "/health" => Endpoint::Health,
            "/ready" => Endpoint::Ready,
            "/info" => Endpoint::Info,
            _ => Endpoint::StatusPage,
        }
    }
}

/// Request target as sent on the request line, minus any scheme/authority
fn request_target(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
}

async fn dispatch(State(state): State<ProbeState>, uri: Uri) -> Response {
    match Endpoint::resolve(request_target(&uri)) {
        Endpoint::Health => Json(health_body(&state.probe)).into_response(),
        Endpoint::Ready => Json(ready_body()).into_response(),
        Endpoint::Info => Json(info_body(&state.config, &state.probe)).into_response(),
        Endpoint::StatusPage => {
            Html(page::render(&state.config, &state.probe.snapshot())).into_response()
        }
    }
}

/// Build the dispatch table
///
/// Everything lands on one handler so the match sees the full target.
pub fn build_router(state: ProbeState) -> Router {
    Router::new().fallback(dispatch).with_state(state)
}
