//! podprobe: liveness, readiness and introspection probes for a container
//!
//! A single HTTP endpoint server with four logical responses:
//! - `/health` - Liveness probe
//! - `/ready` - Readiness probe
//! - `/info` - Runtime snapshot (host, uptime, memory)
//! - anything else - HTML status page

pub mod config;
pub mod runtime;
pub mod server;
