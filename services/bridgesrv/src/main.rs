//! MCU Peripheral Command Bridge (`bridgesrv`)
//!
//! Binds the command listener, spawns the accept loop and parks in the
//! graceful-shutdown waiter.

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use bridgesrv::core::bootstrap::{self, Args};
use bridgesrv::core::config::AppConfig;
use bridgesrv::core::server::BridgeServer;
use bridgesrv::periph::{PeripheralBridge, SimulatedBridge};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = AppConfig::load_from(Path::new(&args.config))?;
    bootstrap::initialize_logging(&args, &config)?;

    // Validation mode: validate and exit
    if args.validate {
        bootstrap::validate_configuration(&config)?;
        return Ok(());
    }

    info!("Starting {} service", config.service.name);

    // The peripheral adapter is the seam to real firmware; without
    // hardware attached the in-memory simulator stands in for it.
    let bridge: Arc<dyn PeripheralBridge> = Arc::new(SimulatedBridge::new());

    let bind_address = bootstrap::determine_bind_address(args.bind_address.clone(), &config);
    let server = BridgeServer::bind(&bind_address, &config.server, bridge).await?;
    info!("Ready for commands on {}", bind_address);

    let shutdown_token = CancellationToken::new();
    let accept_token = shutdown_token.clone();
    let accept_handle = tokio::spawn(async move {
        server.run(accept_token).await;
    });

    common::wait_for_shutdown().await;
    info!("Shutdown signal received");

    shutdown_token.cancel();
    if let Err(e) = accept_handle.await {
        error!("Accept task join error: {}", e);
    }
    info!("Service stopped");

    Ok(())
}
