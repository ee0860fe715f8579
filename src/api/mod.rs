// ============================================================
// Layer 7 — HTTP API
// ============================================================
// A single prediction route over axum:
//
//   POST /predict   {"landmarks": [1404 floats]} → {"emotion": "..."}
//   GET  /health    liveness
//
// The handler only adapts HTTP to the predict use case; all
// validation and fallback behaviour lives in Layer 2.

pub mod handlers;
pub mod routes;
pub mod state;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use tokio::signal;
use tracing::{info, warn};

use self::state::AppState;
use crate::infra::checkpoint::CheckpointManager;

/// Everything `serve` needs, already resolved against the root.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host:              String,
    pub port:              u16,
    pub checkpoint_dir:    PathBuf,
    pub standardize_input: bool,
}

impl ServeConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("'{}' is not an IP address", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Main API server structure
pub struct ApiServer {
    state: AppState,
    addr:  SocketAddr,
}

impl ApiServer {
    pub fn new(state: AppState, addr: SocketAddr) -> Self {
        Self { state, addr }
    }

    /// Load the checkpoint named by `config`. Fails before any socket
    /// is opened if the artifacts are missing or unreadable.
    pub fn from_config(config: &ServeConfig) -> Result<Self> {
        let addr         = config.socket_addr()?;
        let ckpt_manager = CheckpointManager::open(&config.checkpoint_dir)?;
        let state        = AppState::from_checkpoint(&ckpt_manager, config.standardize_input)?;
        Ok(Self::new(state, addr))
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn start(self) -> Result<()> {
        let app = self.create_router();

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server shutdown complete");
        Ok(())
    }

    fn create_router(&self) -> Router {
        routes::router(self.state.clone())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            warn!("Received terminate signal, shutting down...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str) -> ServeConfig {
        ServeConfig {
            host:              host.to_string(),
            port:              5000,
            checkpoint_dir:    PathBuf::from("checkpoints"),
            standardize_input: false,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config("0.0.0.0").socket_addr().unwrap();
        assert_eq!(addr.port(), 5000);
        assert!(addr.ip().is_unspecified());
        assert!(config("localhost:80").socket_addr().is_err());
    }

    #[test]
    fn test_missing_checkpoint_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config("127.0.0.1");
        cfg.checkpoint_dir = dir.path().join("absent");
        assert!(ApiServer::from_config(&cfg).is_err());
    }
}
