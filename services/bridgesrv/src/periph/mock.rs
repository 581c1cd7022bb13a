//! Mock peripheral bridge for testing
//!
//! Records every adapter invocation and returns scripted results, so
//! dispatch and protocol tests can assert exactly which operation was
//! called, with which arguments, without any hardware model behind it.

use async_trait::async_trait;
use tokio::sync::Mutex;

use common::error::{BridgeError, Result};

use super::traits::PeripheralBridge;

/// One recorded adapter invocation: operation name plus rendered args
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub op: String,
    pub args: Vec<String>,
}

/// Scripted peripheral bridge
#[derive(Debug)]
pub struct MockBridge {
    calls: Mutex<Vec<RecordedCall>>,
    digital_read_value: i64,
    analog_read_value: i64,
    analog_write_result: i64,
    can_send_result: i64,
    rgb_led_result: i64,
    scan_result: String,
    transfer_result: String,
    capabilities_result: String,
    /// When set, the named operation fails with the given message
    fail_op: Option<(String, String)>,
}

impl MockBridge {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            digital_read_value: 0,
            analog_read_value: 0,
            analog_write_result: 0,
            can_send_result: 0,
            rgb_led_result: 3,
            scan_result: "[]".to_string(),
            transfer_result: String::new(),
            capabilities_result: "{}".to_string(),
            fail_op: None,
        }
    }

    pub fn with_digital_read(mut self, value: i64) -> Self {
        self.digital_read_value = value;
        self
    }

    pub fn with_analog_read(mut self, value: i64) -> Self {
        self.analog_read_value = value;
        self
    }

    pub fn with_analog_write_result(mut self, result: i64) -> Self {
        self.analog_write_result = result;
        self
    }

    pub fn with_can_send_result(mut self, result: i64) -> Self {
        self.can_send_result = result;
        self
    }

    pub fn with_rgb_led_result(mut self, result: i64) -> Self {
        self.rgb_led_result = result;
        self
    }

    pub fn with_scan_result(mut self, result: String) -> Self {
        self.scan_result = result;
        self
    }

    pub fn with_transfer_result(mut self, result: String) -> Self {
        self.transfer_result = result;
        self
    }

    pub fn with_capabilities_result(mut self, result: String) -> Self {
        self.capabilities_result = result;
        self
    }

    /// Make the named operation fail with a peripheral error
    pub fn failing(mut self, op: &str, message: &str) -> Self {
        self.fail_op = Some((op.to_string(), message.to_string()));
        self
    }

    /// Snapshot of all calls recorded so far
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, op: &str, args: Vec<String>) -> Result<()> {
        self.calls.lock().await.push(RecordedCall {
            op: op.to_string(),
            args,
        });
        if let Some((fail_op, message)) = &self.fail_op {
            if fail_op == op {
                return Err(BridgeError::peripheral(message.clone()));
            }
        }
        Ok(())
    }
}

impl Default for MockBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PeripheralBridge for MockBridge {
    async fn digital_write(&self, pin: i64, value: i64) -> Result<()> {
        self.record("digital_write", vec![pin.to_string(), value.to_string()])
            .await
    }

    async fn digital_read(&self, pin: i64) -> Result<i64> {
        self.record("digital_read", vec![pin.to_string()]).await?;
        Ok(self.digital_read_value)
    }

    async fn analog_read(&self, channel: i64) -> Result<i64> {
        self.record("analog_read", vec![channel.to_string()]).await?;
        Ok(self.analog_read_value)
    }

    async fn analog_write(&self, pin: i64, duty: i64) -> Result<i64> {
        self.record("analog_write", vec![pin.to_string(), duty.to_string()])
            .await?;
        Ok(self.analog_write_result)
    }

    async fn i2c_scan(&self) -> Result<String> {
        self.record("i2c_scan", Vec::new()).await?;
        Ok(self.scan_result.clone())
    }

    async fn i2c_transfer(&self, addr: i64, hex_data: &str, rx_len: i64) -> Result<String> {
        self.record(
            "i2c_transfer",
            vec![addr.to_string(), hex_data.to_string(), rx_len.to_string()],
        )
        .await?;
        Ok(self.transfer_result.clone())
    }

    async fn spi_transfer(&self, hex_data: &str) -> Result<String> {
        self.record("spi_transfer", vec![hex_data.to_string()]).await?;
        Ok(self.transfer_result.clone())
    }

    async fn can_send(&self, can_id: i64, hex_data: &str) -> Result<i64> {
        self.record("can_send", vec![can_id.to_string(), hex_data.to_string()])
            .await?;
        Ok(self.can_send_result)
    }

    async fn led_matrix(&self, hex_bitmap: &str) -> Result<()> {
        self.record("led_matrix", vec![hex_bitmap.to_string()]).await
    }

    async fn rgb_led(&self, led_id: i64, r: i64, g: i64, b: i64) -> Result<i64> {
        self.record(
            "rgb_led",
            vec![
                led_id.to_string(),
                r.to_string(),
                g.to_string(),
                b.to_string(),
            ],
        )
        .await?;
        Ok(self.rgb_led_result)
    }

    async fn capabilities(&self) -> Result<String> {
        self.record("capabilities", Vec::new()).await?;
        Ok(self.capabilities_result.clone())
    }
}
