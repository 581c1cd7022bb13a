//! Peripheral bridge adapter interface
//!
//! The service never touches hardware registers itself; every command
//! resolves to exactly one call on this trait. Implementations own their
//! concurrency safety (bus serialization, register access); the dispatch
//! layer takes no locks around these calls.
//!
//! Several operations report rejection through in-band sentinel codes
//! rather than errors, mirroring the firmware call convention. Which
//! sentinel means what is documented per method; the dispatcher maps
//! them to client-facing messages.

use async_trait::async_trait;

use common::error::Result;

/// Synchronous call contract to the board's peripheral interface
#[async_trait]
pub trait PeripheralBridge: Send + Sync + std::fmt::Debug {
    /// Drive a digital output pin high or low
    async fn digital_write(&self, pin: i64, value: i64) -> Result<()>;

    /// Read a digital input pin (0 or 1)
    async fn digital_read(&self, pin: i64) -> Result<i64>;

    /// Read an ADC channel
    async fn analog_read(&self, channel: i64) -> Result<i64>;

    /// Write a PWM duty cycle to a pin
    ///
    /// Returns the applied duty, or `-1` when the pin has no PWM unit.
    async fn analog_write(&self, pin: i64, duty: i64) -> Result<i64>;

    /// Scan the I2C bus for responding device addresses
    async fn i2c_scan(&self) -> Result<String>;

    /// Write `hex_data` to the device at `addr`, then read `rx_len` bytes
    async fn i2c_transfer(&self, addr: i64, hex_data: &str, rx_len: i64) -> Result<String>;

    /// Full-duplex SPI transfer; returns the bytes clocked in as hex
    async fn spi_transfer(&self, hex_data: &str) -> Result<String>;

    /// Send a CAN frame
    ///
    /// Returns `0` on success, or `-2` when no CAN controller is
    /// available on this board.
    async fn can_send(&self, can_id: i64, hex_data: &str) -> Result<i64>;

    /// Display a bitmap on the LED matrix
    async fn led_matrix(&self, hex_bitmap: &str) -> Result<()>;

    /// Set one of the user RGB LEDs
    ///
    /// Returns the led id on success, or `-1` for an unknown id.
    async fn rgb_led(&self, led_id: i64, r: i64, g: i64, b: i64) -> Result<i64>;

    /// Describe the peripherals this board exposes
    async fn capabilities(&self) -> Result<String>;
}
