//! Development gateway server

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::routes::create_router;
use crate::state::{GatewayState, SharedState};

pub struct GatewayServer {
    state: SharedState,
    addr: SocketAddr,
}

impl GatewayServer {
    pub fn new(state: GatewayState, addr: SocketAddr) -> Self {
        Self {
            state: SharedState::new(state),
            addr,
        }
    }

    pub async fn run(self) -> Result<()> {
        let router = create_router(self.state);

        tracing::info!("Starting FHEVM gateway on {}", self.addr);

        let listener = TcpListener::bind(self.addr).await?;
        axum::serve(listener, router)
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        Ok(())
    }

    /// Get the server state for testing
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

pub struct ServerBuilder {
    config: GatewayConfig,
    addr: SocketAddr,
    prometheus: Option<PrometheusHandle>,
}

impl ServerBuilder {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            addr: ([127, 0, 0, 1], 8545).into(),
            prometheus: None,
        }
    }

    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.addr = ([0, 0, 0, 0], port).into();
        self
    }

    /// Serve `/metrics` from this recorder
    pub fn prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    pub fn build(self) -> Result<GatewayServer> {
        let mut state = GatewayState::new(self.config)?;
        if let Some(handle) = self.prometheus {
            state = state.with_prometheus(handle);
        }
        Ok(GatewayServer::new(state, self.addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let server = ServerBuilder::new(GatewayConfig::default()).build().unwrap();
        assert_eq!(server.addr(), ([127, 0, 0, 1], 8545).into());
        assert_eq!(server.state().config.chain_id, 31337);
    }

    #[test]
    fn test_builder_rejects_bad_acl() {
        let config = GatewayConfig {
            acl_address: "nope".to_string(),
            ..GatewayConfig::default()
        };
        assert!(matches!(
            ServerBuilder::new(config).port(0).build(),
            Err(GatewayError::InvalidAddress(_))
        ));
    }
}
