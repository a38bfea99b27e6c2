//! Graceful shutdown handling for the probe server
//!
//! SIGTERM moves the server through `Running -> Draining -> Stopped`:
//! - Stops accepting new connections
//! - Lets accepted requests finish writing their responses
//! - Reports `Stopped` once every connection is closed

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// Lifecycle of the listening server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Socket bound, accepting connections
    Running,
    /// Termination requested, finishing in-flight requests
    Draining,
    /// All connections closed
    Stopped,
}

/// Receiving half of the shutdown channel, handed to `ProbeServer::run`
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait for shutdown signal
    pub async fn wait(&mut self) {
        while !*self.receiver.borrow() {
            if self.receiver.changed().await.is_err() {
                // Sender dropped, treat as shutdown
                break;
            }
        }
    }

    #[cfg(test)]
    pub fn is_shutdown(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Controller for triggering shutdown
pub struct ShutdownController {
    sender: watch::Sender<bool>,
}

impl ShutdownController {
    /// Trigger shutdown
    ///
    /// Only the first call notifies listeners and returns `true`.
    pub fn shutdown(&self) -> bool {
        let first = self.sender.send_if_modified(|triggered| {
            let changed = !*triggered;
            *triggered = true;
            changed
        });
        if first {
            info!("Shutdown signal sent");
        }
        first
    }
}

/// Create a new shutdown signal pair
///
/// Returns (controller, signal) where:
/// - controller: Used to trigger shutdown
/// - signal: Passed to the server, which drains once it fires
pub fn shutdown_channel() -> (ShutdownController, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownController { sender }, ShutdownSignal { receiver })
}

/// Register the SIGTERM handler and forward the first signal to `controller`
///
/// Registration happens before this returns, so a signal delivered right
/// after startup is never lost. Fails only if the OS refuses the handler.
#[cfg(unix)]
pub fn spawn_signal_forwarder(controller: ShutdownController) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        if sigterm.recv().await.is_some() {
            info!("Received SIGTERM");
            controller.shutdown();
        }
    }))
}

/// Forward Ctrl+C as the termination request (non-Unix hosts)
#[cfg(not(unix))]
pub fn spawn_signal_forwarder(controller: ShutdownController) -> std::io::Result<JoinHandle<()>> {
    use tracing::error;

    Ok(tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C");
                controller.shutdown();
            }
            Err(e) => error!(error = %e, "Failed to wait for Ctrl+C"),
        }
    }))
}
