use std::sync::Arc;

use tokio::net::TcpListener;

use rtb_engine::Leaderboard;
use rtb_store::FileStore;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::observer::TracingDropObserver;
use crate::router::build_router;

/// Leaderboard HTTP server over a file-backed store.
pub struct BoardServer {
    config: ServerConfig,
    board: Leaderboard,
}

impl BoardServer {
    /// Open the data directory named by `config` and assemble the board.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let store = FileStore::open(&config.data_dir)?.with_observer(Arc::new(TracingDropObserver));
        let board = Leaderboard::new(Arc::new(store));
        Ok(Self { config, board })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.board.clone(), &self.config)
    }

    /// Serve until Ctrl-C. In-flight mutations finish before the process exits.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            data_dir = %self.config.data_dir.display(),
            "leaderboard server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
