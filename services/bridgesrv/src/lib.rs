//! MCU Peripheral Command Bridge (`bridgesrv`)
//!
//! A small async TCP service that accepts one-line text commands from
//! local clients and routes each to the corresponding operation on the
//! board's peripheral bridge adapter (GPIO, ADC, PWM, I2C, SPI, CAN,
//! LED matrix, RGB LEDs, capability introspection).
//!
//! The protocol is deliberately minimal: one command per connection, one
//! response line, connection closed afterwards.

pub mod core;
pub mod periph;

pub use crate::core::config::AppConfig;
pub use crate::core::server::BridgeServer;
pub use crate::periph::PeripheralBridge;
