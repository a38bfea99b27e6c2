//! Listening socket lifecycle: bind, serve, drain
//!
//! [`ProbeServer::bind`] enters `Running`; [`ProbeServer::run`] serves until
//! the shutdown signal fires, then drains and reports `Stopped`.

use crate::config::Config;
use crate::runtime::RuntimeProbe;
use crate::server::routes::{build_router, ProbeState};
use crate::server::shutdown::{LifecycleState, ShutdownSignal};
use axum::Router;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read listener address: {0}")]
    LocalAddr(#[source] std::io::Error),

    #[error("HTTP server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// A bound probe server, ready to serve
pub struct ProbeServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Router,
    shutdown_timeout: Option<Duration>,
    state: watch::Sender<LifecycleState>,
}

impl ProbeServer {
    /// Bind `0.0.0.0:<config.port>` and log the startup banner
    ///
    /// Bind failure is returned as-is; callers must not retry.
    pub async fn bind(config: Arc<Config>, probe: Arc<RuntimeProbe>) -> Result<Self, ServerError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        Self::bind_addr(addr, config, probe).await
    }

    /// Bind an explicit address (tests use `127.0.0.1:0`)
    pub async fn bind_addr(
        addr: SocketAddr,
        config: Arc<Config>,
        probe: Arc<RuntimeProbe>,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                port: addr.port(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;
        let (state, _) = watch::channel(LifecycleState::Running);

        // Log after successful bind - server is actually listening
        let port = local_addr.port();
        info!(
            app = %config.app_name,
            version = %config.app_version,
            port,
            "{} v{} running on port {}",
            config.app_name,
            config.app_version,
            port
        );
        info!("Health check: http://localhost:{}/health", port);
        info!("Readiness:    http://localhost:{}/ready", port);
        info!("Info:         http://localhost:{}/info", port);

        let shutdown_timeout = config.shutdown_timeout;
        let router = build_router(ProbeState::new(config, probe));

        Ok(Self {
            listener,
            local_addr,
            router,
            shutdown_timeout,
            state,
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Observe lifecycle transitions
    pub fn lifecycle(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Serve until `shutdown` fires, then drain open connections
    ///
    /// Returns once the server is `Stopped`. Per-connection I/O errors
    /// during the drain are absorbed by their connection tasks.
    pub async fn run(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let Self {
            listener,
            router,
            shutdown_timeout,
            state,
            ..
        } = self;

        let drain_state = state.clone();
        let mut drain_signal = shutdown;
        let serve = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                drain_signal.wait().await;
                drain_state.send_replace(LifecycleState::Draining);
                info!("Termination requested, shutting down gracefully");
            })
            .into_future();

        match shutdown_timeout {
            None => serve.await.map_err(ServerError::Serve)?,
            Some(limit) => {
                let mut lifecycle = state.subscribe();
                let deadline = async move {
                    let draining = lifecycle
                        .wait_for(|s| *s == LifecycleState::Draining)
                        .await
                        .is_ok();
                    if draining {
                        tokio::time::sleep(limit).await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                };

                tokio::select! {
                    result = serve => result.map_err(ServerError::Serve)?,
                    _ = deadline => {
                        warn!(
                            timeout_secs = limit.as_secs_f64(),
                            "Drain timeout elapsed, closing remaining connections"
                        );
                    }
                }
            }
        }

        state.send_replace(LifecycleState::Stopped);
        info!("Server closed");
        Ok(())
    }
}
