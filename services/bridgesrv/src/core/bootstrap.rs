//! Service bootstrap and initialization
//!
//! Command-line arguments, logging setup and configuration validation.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use common::error::{BridgeError, Result};
use common::logging::{self, LogConfig};

use crate::core::config::AppConfig;

/// Command-line arguments for bridgesrv
#[derive(Parser, Clone)]
#[command(
    name = "bridgesrv",
    version = env!("CARGO_PKG_VERSION"),
    about = "MCU Peripheral Command Bridge",
    long_about = None
)]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    pub log_level: String,

    /// Bind address for the command listener
    #[arg(short = 'b', long)]
    pub bind_address: Option<String>,

    /// Enable debug mode
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Validation mode - only validate configuration without starting
    #[arg(long)]
    pub validate: bool,

    /// Path to the configuration file
    #[arg(short = 'c', long, default_value = "bridgesrv.toml")]
    pub config: String,
}

/// Initialize the logging system from CLI arguments and configuration
pub fn initialize_logging(args: &Args, config: &AppConfig) -> Result<()> {
    let console_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        logging::parse_level(&args.log_level)
    };

    let log_config = LogConfig {
        service_name: config.service.name.clone(),
        log_dir: PathBuf::from(&config.logging.dir).join(&config.service.name),
        console_level,
        file_level: tracing::Level::DEBUG,
        enable_file: config.logging.file_enabled,
        ansi: !args.no_color,
    };

    logging::init_with_config(log_config)
}

/// Validate the loaded configuration and log a summary
pub fn validate_configuration(config: &AppConfig) -> Result<()> {
    info!("Service: {}", config.service.name);
    if let Some(description) = &config.service.description {
        info!("Description: {}", description);
    }

    let bind_address = config.bind_address();
    bind_address
        .parse::<std::net::SocketAddr>()
        .map_err(|e| BridgeError::config(format!("invalid bind address '{}': {}", bind_address, e)))?;

    if config.server.read_buffer_size == 0 {
        return Err(BridgeError::config("read_buffer_size must be non-zero"));
    }
    if config.server.accept_timeout_ms == 0 {
        return Err(BridgeError::config("accept_timeout_ms must be non-zero"));
    }

    info!("Command listener: {}", bind_address);
    info!("Configuration validation completed successfully");
    Ok(())
}

/// Determine bind address from multiple sources
/// Priority: CLI > Config
pub fn determine_bind_address(cli_arg: Option<String>, config: &AppConfig) -> String {
    if let Some(addr) = cli_arg {
        info!("Using bind address from command line: {}", addr);
        return addr;
    }
    config.bind_address()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_bind_address_prefers_cli() {
        let config = AppConfig::default();
        let addr = determine_bind_address(Some("0.0.0.0:7777".to_string()), &config);
        assert_eq!(addr, "0.0.0.0:7777");
        let addr = determine_bind_address(None, &config);
        assert_eq!(addr, "127.0.0.1:9999");
    }

    #[test]
    fn test_validate_rejects_zero_read_buffer() {
        let mut config = AppConfig::default();
        config.server.read_buffer_size = 0;
        assert!(validate_configuration(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_host() {
        let mut config = AppConfig::default();
        config.server.host = "not a host".to_string();
        assert!(validate_configuration(&config).is_err());
    }
}
