//! In-memory peripheral simulator
//!
//! Stands in for the firmware bridge when the service runs without real
//! hardware attached. Models just enough peripheral state to exercise
//! every command end to end: GPIO pin levels, PWM-capable pins, a couple
//! of I2C devices, the LED matrix framebuffer and the two user RGB LEDs.
//! CAN reports unavailable, as on boards without a transceiver.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use common::error::{BridgeError, Result};
use common::hex::{bytes_to_hex, hex_to_bytes};

use super::traits::PeripheralBridge;

/// Pins with a PWM unit, classic Arduino layout
const PWM_PINS: &[i64] = &[3, 5, 6, 9, 10, 11];

/// The two user-controllable RGB LEDs
const RGB_LED_IDS: &[i64] = &[3, 4];

/// ADC reading for a floating channel
const ADC_IDLE_READING: i64 = 512;

#[derive(Debug)]
struct SimState {
    gpio: HashMap<i64, i64>,
    pwm: HashMap<i64, i64>,
    adc: HashMap<i64, i64>,
    rgb: HashMap<i64, (i64, i64, i64)>,
    matrix: Vec<u8>,
    /// I2C addresses that answer a scan (a display and an RTC)
    i2c_devices: Vec<i64>,
}

impl SimState {
    fn new() -> Self {
        Self {
            gpio: HashMap::new(),
            pwm: HashMap::new(),
            adc: HashMap::new(),
            rgb: HashMap::new(),
            matrix: Vec::new(),
            i2c_devices: vec![0x3c, 0x68],
        }
    }
}

/// Simulated peripheral bridge
#[derive(Debug)]
pub struct SimulatedBridge {
    state: RwLock<SimState>,
}

impl SimulatedBridge {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SimState::new()),
        }
    }

    /// Preset an ADC channel reading, for tests and demos
    pub async fn set_adc_reading(&self, channel: i64, value: i64) {
        self.state.write().await.adc.insert(channel, value);
    }
}

impl Default for SimulatedBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PeripheralBridge for SimulatedBridge {
    async fn digital_write(&self, pin: i64, value: i64) -> Result<()> {
        if pin < 0 {
            return Err(BridgeError::invalid_parameter(format!(
                "negative pin number: {}",
                pin
            )));
        }
        let level = i64::from(value != 0);
        debug!("digitalWrite({}, {})", pin, level);
        self.state.write().await.gpio.insert(pin, level);
        Ok(())
    }

    async fn digital_read(&self, pin: i64) -> Result<i64> {
        if pin < 0 {
            return Err(BridgeError::invalid_parameter(format!(
                "negative pin number: {}",
                pin
            )));
        }
        Ok(self.state.read().await.gpio.get(&pin).copied().unwrap_or(0))
    }

    async fn analog_read(&self, channel: i64) -> Result<i64> {
        if channel < 0 {
            return Err(BridgeError::invalid_parameter(format!(
                "negative ADC channel: {}",
                channel
            )));
        }
        Ok(self
            .state
            .read()
            .await
            .adc
            .get(&channel)
            .copied()
            .unwrap_or(ADC_IDLE_READING))
    }

    async fn analog_write(&self, pin: i64, duty: i64) -> Result<i64> {
        if !PWM_PINS.contains(&pin) {
            return Ok(-1);
        }
        if !(0..=255).contains(&duty) {
            return Err(BridgeError::invalid_parameter(format!(
                "duty cycle out of range 0..=255: {}",
                duty
            )));
        }
        debug!("analogWrite({}, {})", pin, duty);
        self.state.write().await.pwm.insert(pin, duty);
        Ok(duty)
    }

    async fn i2c_scan(&self) -> Result<String> {
        let state = self.state.read().await;
        Ok(format!("{:?}", state.i2c_devices))
    }

    async fn i2c_transfer(&self, addr: i64, hex_data: &str, rx_len: i64) -> Result<String> {
        let tx = hex_to_bytes(hex_data)?;
        if rx_len < 0 {
            return Err(BridgeError::invalid_parameter(format!(
                "negative receive length: {}",
                rx_len
            )));
        }
        let state = self.state.read().await;
        if !state.i2c_devices.contains(&addr) {
            return Err(BridgeError::peripheral(format!(
                "no I2C device answered at address {:#04x}",
                addr
            )));
        }
        debug!(
            "i2cTransfer({:#04x}): {} bytes out, {} requested",
            addr,
            tx.len(),
            rx_len
        );
        // The simulated device has no registers to read back
        Ok(bytes_to_hex(&vec![0u8; rx_len as usize]))
    }

    async fn spi_transfer(&self, hex_data: &str) -> Result<String> {
        let tx = hex_to_bytes(hex_data)?;
        // Full duplex with nothing on the bus: MISO idles low
        Ok(bytes_to_hex(&vec![0u8; tx.len()]))
    }

    async fn can_send(&self, can_id: i64, _hex_data: &str) -> Result<i64> {
        debug!("canSend({:#x}) rejected: no CAN transceiver", can_id);
        Ok(-2)
    }

    async fn led_matrix(&self, hex_bitmap: &str) -> Result<()> {
        let bitmap = hex_to_bytes(hex_bitmap)?;
        self.state.write().await.matrix = bitmap;
        Ok(())
    }

    async fn rgb_led(&self, led_id: i64, r: i64, g: i64, b: i64) -> Result<i64> {
        if !RGB_LED_IDS.contains(&led_id) {
            return Ok(-1);
        }
        for (name, component) in [("r", r), ("g", g), ("b", b)] {
            if !(0..=255).contains(&component) {
                return Err(BridgeError::invalid_parameter(format!(
                    "{} component out of range 0..=255: {}",
                    name, component
                )));
            }
        }
        self.state.write().await.rgb.insert(led_id, (r, g, b));
        Ok(led_id)
    }

    async fn capabilities(&self) -> Result<String> {
        let caps = serde_json::json!({
            "gpio": true,
            "adc_channels": 8,
            "pwm_pins": PWM_PINS,
            "i2c": true,
            "spi": true,
            "can": false,
            "led_matrix": true,
            "rgb_leds": RGB_LED_IDS,
        });
        Ok(caps.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gpio_write_then_read() {
        let bridge = SimulatedBridge::new();
        bridge.digital_write(5, 1).await.expect("write");
        assert_eq!(bridge.digital_read(5).await.expect("read"), 1);
        // Unwritten pins read low
        assert_eq!(bridge.digital_read(6).await.expect("read"), 0);
    }

    #[tokio::test]
    async fn test_pwm_sentinel_on_non_pwm_pin() {
        let bridge = SimulatedBridge::new();
        assert_eq!(bridge.analog_write(2, 128).await.expect("write"), -1);
        assert_eq!(bridge.analog_write(9, 128).await.expect("write"), 128);
    }

    #[tokio::test]
    async fn test_rgb_led_sentinel_on_unknown_id() {
        let bridge = SimulatedBridge::new();
        assert_eq!(bridge.rgb_led(7, 255, 0, 0).await.expect("rgb"), -1);
        assert_eq!(bridge.rgb_led(3, 255, 0, 0).await.expect("rgb"), 3);
    }

    #[tokio::test]
    async fn test_can_reports_unavailable() {
        let bridge = SimulatedBridge::new();
        assert_eq!(bridge.can_send(0x100, "DEADBEEF").await.expect("can"), -2);
    }

    #[tokio::test]
    async fn test_i2c_transfer_rejects_bad_hex() {
        let bridge = SimulatedBridge::new();
        let err = bridge.i2c_transfer(0x3c, "xyz", 2).await.unwrap_err();
        assert!(err.to_string().contains("hex"));
    }

    #[tokio::test]
    async fn test_i2c_transfer_unknown_address() {
        let bridge = SimulatedBridge::new();
        let err = bridge.i2c_transfer(0x01, "a0", 1).await.unwrap_err();
        assert!(err.to_string().contains("no I2C device"));
    }

    #[tokio::test]
    async fn test_spi_transfer_echoes_length() {
        let bridge = SimulatedBridge::new();
        let rx = bridge.spi_transfer("a0b1c2").await.expect("spi");
        assert_eq!(rx, "000000");
    }

    #[tokio::test]
    async fn test_adc_preset_and_idle() {
        let bridge = SimulatedBridge::new();
        assert_eq!(bridge.analog_read(0).await.expect("adc"), ADC_IDLE_READING);
        bridge.set_adc_reading(0, 734).await;
        assert_eq!(bridge.analog_read(0).await.expect("adc"), 734);
    }

    #[tokio::test]
    async fn test_capabilities_is_json() {
        let bridge = SimulatedBridge::new();
        let caps = bridge.capabilities().await.expect("caps");
        let parsed: serde_json::Value = serde_json::from_str(&caps).expect("json");
        assert_eq!(parsed["can"], serde_json::json!(false));
    }
}
