//! TCP acceptor and server lifecycle
//!
//! The listening socket is bound once at startup with prompt address
//! reuse. The accept loop waits a bounded interval per attempt so it can
//! observe the shutdown token, and hands every accepted connection to a
//! freshly spawned, detached handler task; nothing is processed inline
//! on the accept path.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpSocket};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use common::error::{BridgeError, Result};

use crate::core::config::ServerConfig;
use crate::core::handler::{handle_connection, ConnectionLimits};
use crate::periph::PeripheralBridge;

/// The command bridge server: one bound listener plus the shared adapter
pub struct BridgeServer {
    listener: TcpListener,
    bridge: Arc<dyn PeripheralBridge>,
    accept_timeout: Duration,
    limits: ConnectionLimits,
}

impl BridgeServer {
    /// Bind the listening socket once, with `SO_REUSEADDR` so restarts
    /// reclaim the port promptly
    pub async fn bind(
        bind_address: &str,
        config: &ServerConfig,
        bridge: Arc<dyn PeripheralBridge>,
    ) -> Result<Self> {
        let addr: SocketAddr = bind_address.parse().map_err(|e| {
            BridgeError::config(format!("invalid bind address '{}': {}", bind_address, e))
        })?;

        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(|e| BridgeError::connection(format!("failed to create socket: {}", e)))?;
        socket
            .set_reuseaddr(true)
            .map_err(|e| BridgeError::connection(format!("failed to set SO_REUSEADDR: {}", e)))?;
        socket
            .bind(addr)
            .map_err(|e| BridgeError::connection(format!("failed to bind to {}: {}", addr, e)))?;
        let listener = socket
            .listen(config.backlog)
            .map_err(|e| BridgeError::connection(format!("failed to listen: {}", e)))?;

        info!("Command listener bound on {}", addr);

        let request_timeout = if config.request_timeout_ms > 0 {
            Some(Duration::from_millis(config.request_timeout_ms))
        } else {
            None
        };

        Ok(Self {
            listener,
            bridge,
            accept_timeout: Duration::from_millis(config.accept_timeout_ms),
            limits: ConnectionLimits {
                read_buffer_size: config.read_buffer_size,
                request_timeout,
            },
        })
    }

    /// Address the listener actually bound to (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| BridgeError::io(e.to_string()))
    }

    /// Accept connections until the token is cancelled or the listener
    /// fails fatally; in-flight handlers run to completion either way
    pub async fn run(self, shutdown: CancellationToken) {
        info!("Accept loop started");
        loop {
            if shutdown.is_cancelled() {
                break;
            }
            match tokio::time::timeout(self.accept_timeout, self.listener.accept()).await {
                // Bounded wait elapsed with no client; re-check shutdown
                Err(_) => continue,
                Ok(Ok((stream, addr))) => {
                    debug!("Accepted connection from {}", addr);
                    let bridge = Arc::clone(&self.bridge);
                    let limits = self.limits;
                    tokio::spawn(async move {
                        handle_connection(stream, bridge, limits).await;
                    });
                },
                Ok(Err(e)) => {
                    error!("Accept failed, stopping listener: {}", e);
                    break;
                },
            }
        }
        info!("Accept loop stopped");
    }
}
