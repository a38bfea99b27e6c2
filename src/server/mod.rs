//! HTTP endpoint server for Kubernetes probes
//!
//! Provides:
//! - `/health` - Liveness probe (process is running)
//! - `/ready` - Readiness probe
//! - `/info` - Runtime introspection
//! - any other request target (including `/health?x=1`) - HTML status page
//!
//! Also provides graceful shutdown handling for SIGTERM.

mod http;
mod page;
pub mod routes;
pub mod shutdown;

pub use http::{ProbeServer, ServerError};
pub use routes::{build_router, ProbeState};
pub use shutdown::{
    shutdown_channel, spawn_signal_forwarder, LifecycleState, ShutdownController, ShutdownSignal,
};

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_tests;

#[cfg(test)]
#[path = "http_test.rs"]
mod http_tests;

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_tests;
