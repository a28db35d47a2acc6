use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Publisher HTTP server.
pub struct GrcServer {
    bind_addr: SocketAddr,
    state: AppState,
}

impl GrcServer {
    pub fn new(state: AppState) -> Self {
        Self {
            bind_addr: state.config.server.bind_addr,
            state,
        }
    }

    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = build_router(self.state);
        let listener = TcpListener::bind(self.bind_addr).await?;
        tracing::info!("GRC publisher listening on {}", self.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
