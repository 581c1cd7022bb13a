//! Per-connection command handling
//!
//! Each accepted socket is owned by exactly one task: a single bounded
//! read, one parse/dispatch pass, one response line, then the socket is
//! dropped. The protocol assumes the client sends the whole command in
//! one write and reads one reply; there is no framing beyond that.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use common::error::{BridgeError, Result};

use crate::core::dispatch::{dispatch, Outcome};
use crate::core::parser::parse_command;
use crate::periph::PeripheralBridge;

/// Per-connection I/O limits, fixed at server startup
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    /// Maximum bytes accepted in the single request read
    pub read_buffer_size: usize,
    /// Optional deadline over the whole read-dispatch-write cycle
    pub request_timeout: Option<Duration>,
}

/// Serve one connection, then close it
///
/// Every failure is resolved here: the client gets a best-effort
/// `error: ...` line, a failure of that write is suppressed, and the
/// socket closes on every exit path when the stream drops.
pub async fn handle_connection(
    mut stream: TcpStream,
    bridge: Arc<dyn PeripheralBridge>,
    limits: ConnectionLimits,
) {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());

    let result = match limits.request_timeout {
        Some(deadline) => {
            match tokio::time::timeout(
                deadline,
                run_cycle(&mut stream, bridge.as_ref(), limits.read_buffer_size),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(BridgeError::Timeout("request deadline exceeded".to_string())),
            }
        },
        None => run_cycle(&mut stream, bridge.as_ref(), limits.read_buffer_size).await,
    };

    if let Err(e) = result {
        warn!("Connection {} failed: {}", peer, e);
        let line = format!("error: {}\n", e);
        // Best effort; the peer may already be gone
        let _ = stream.write_all(line.as_bytes()).await;
    }
}

async fn run_cycle(
    stream: &mut TcpStream,
    bridge: &dyn PeripheralBridge,
    read_buffer_size: usize,
) -> Result<()> {
    let mut buffer = vec![0u8; read_buffer_size];
    let n = stream
        .read(&mut buffer)
        .await
        .map_err(|e| BridgeError::io(format!("request read failed: {}", e)))?;

    let outcome = match parse_command(&buffer[..n]) {
        None => Outcome::MalformedCommand,
        Some(command) => {
            debug!("Received command '{}' ({} args)", command.name, command.args.len());
            dispatch(bridge, &command).await
        },
    };

    stream
        .write_all(outcome.render().as_bytes())
        .await
        .map_err(|e| BridgeError::io(format!("response write failed: {}", e)))?;

    Ok(())
}
