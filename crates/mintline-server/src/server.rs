use std::sync::Arc;

use mintline_ledger::InMemoryLedger;
use tokio::net::TcpListener;

use crate::config::NodeConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// A ledger node: one in-memory ledger served over HTTP.
pub struct MintlineNode {
    config: Arc<NodeConfig>,
    ledger: Arc<InMemoryLedger>,
}

impl MintlineNode {
    pub fn new(config: NodeConfig) -> Self {
        let ledger = InMemoryLedger::new(config.ledger_config())
            .with_confirmation_policy(config.confirmation_policy());
        Self {
            config: Arc::new(config),
            ledger: Arc::new(ledger),
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The hosted ledger, for in-process access alongside the HTTP surface.
    pub fn ledger(&self) -> Arc<InMemoryLedger> {
        Arc::clone(&self.ledger)
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState {
            ledger: Arc::clone(&self.ledger),
            config: Arc::clone(&self.config),
        })
    }

    /// Bind the configured address and serve until the task is dropped.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already-bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> ServerResult<()> {
        let app = self.router();
        let addr = listener.local_addr()?;
        tracing::info!(%addr, "mintline node listening");
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
