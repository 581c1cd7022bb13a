//! Command dispatch table and outcome mapping
//!
//! Maps each wire command to one peripheral adapter operation, validates
//! argument arity and types, and folds the adapter's heterogeneous
//! results (plain values, sentinel rejection codes, errors) into a
//! uniform [`Outcome`].

use tracing::debug;

use crate::core::parser::Command;
use crate::periph::PeripheralBridge;

// Adapter sentinel codes. These are per-operation magic numbers, not a
// shared convention: -1 from analogWrite and -1 from rgbLed mean
// different rejections and must map to different messages.
const PWM_NOT_SUPPORTED: i64 = -1;
const CAN_UNAVAILABLE: i64 = -2;
const RGB_UNKNOWN_LED: i64 = -1;

/// Peripheral operation behind a wire command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOp {
    GpioWrite,
    GpioRead,
    AdcRead,
    PwmWrite,
    I2cScan,
    I2cTransfer,
    SpiTransfer,
    CanSend,
    LedMatrix,
    RgbLed,
    Capabilities,
}

/// Static dispatch entry: command name, minimum argument count, operation
#[derive(Debug)]
pub struct DispatchEntry {
    pub name: &'static str,
    pub min_args: usize,
    pub op: CommandOp,
}

/// Process-wide command table; built once, never mutated at runtime
pub static DISPATCH_TABLE: &[DispatchEntry] = &[
    DispatchEntry { name: "gpio_write", min_args: 2, op: CommandOp::GpioWrite },
    DispatchEntry { name: "gpio_read", min_args: 1, op: CommandOp::GpioRead },
    DispatchEntry { name: "adc_read", min_args: 1, op: CommandOp::AdcRead },
    DispatchEntry { name: "pwm_write", min_args: 2, op: CommandOp::PwmWrite },
    DispatchEntry { name: "i2c_scan", min_args: 0, op: CommandOp::I2cScan },
    DispatchEntry { name: "i2c_transfer", min_args: 3, op: CommandOp::I2cTransfer },
    DispatchEntry { name: "spi_transfer", min_args: 1, op: CommandOp::SpiTransfer },
    DispatchEntry { name: "can_send", min_args: 2, op: CommandOp::CanSend },
    DispatchEntry { name: "led_matrix", min_args: 1, op: CommandOp::LedMatrix },
    DispatchEntry { name: "rgb_led", min_args: 4, op: CommandOp::RgbLed },
    DispatchEntry { name: "capabilities", min_args: 0, op: CommandOp::Capabilities },
];

/// Result of dispatching one command, prior to text rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Operation succeeded; `None` renders as the bare `ok` line
    Ok(Option<String>),
    /// Operation-level failure with a client-facing reason
    DomainError(String),
    /// Unrecognized name, or a recognized name with too few arguments
    UnknownCommand,
    /// Empty input
    MalformedCommand,
}

impl Outcome {
    /// Render the single response line written back to the client
    pub fn render(&self) -> String {
        match self {
            Outcome::Ok(None) => "ok\n".to_string(),
            Outcome::Ok(Some(payload)) => format!("{}\n", payload),
            Outcome::DomainError(message) => format!("error: {}\n", message),
            Outcome::UnknownCommand => "error: unknown command\n".to_string(),
            Outcome::MalformedCommand => "error: empty command\n".to_string(),
        }
    }
}

fn lookup(name: &str) -> Option<&'static DispatchEntry> {
    DISPATCH_TABLE.iter().find(|entry| entry.name == name)
}

fn int_arg(args: &[String], index: usize) -> std::result::Result<i64, String> {
    args[index].parse::<i64>().map_err(|e| e.to_string())
}

/// Dispatch one parsed command against the peripheral bridge
///
/// Unknown names and short argument lists fold into the same
/// `UnknownCommand` outcome; the wire protocol does not distinguish them.
pub async fn dispatch(bridge: &dyn PeripheralBridge, command: &Command) -> Outcome {
    let entry = match lookup(&command.name) {
        Some(entry) => entry,
        None => return Outcome::UnknownCommand,
    };
    if command.args.len() < entry.min_args {
        return Outcome::UnknownCommand;
    }

    debug!("Dispatching {} ({:?})", command.name, entry.op);
    match run_entry(bridge, entry.op, &command.args).await {
        Ok(outcome) => outcome,
        Err(message) => Outcome::DomainError(message),
    }
}

async fn run_entry(
    bridge: &dyn PeripheralBridge,
    op: CommandOp,
    args: &[String],
) -> std::result::Result<Outcome, String> {
    match op {
        CommandOp::GpioWrite => {
            let pin = int_arg(args, 0)?;
            let value = int_arg(args, 1)?;
            bridge
                .digital_write(pin, value)
                .await
                .map_err(|e| e.to_string())?;
            Ok(Outcome::Ok(None))
        },
        CommandOp::GpioRead => {
            let pin = int_arg(args, 0)?;
            let value = bridge.digital_read(pin).await.map_err(|e| e.to_string())?;
            Ok(Outcome::Ok(Some(value.to_string())))
        },
        CommandOp::AdcRead => {
            let channel = int_arg(args, 0)?;
            let value = bridge
                .analog_read(channel)
                .await
                .map_err(|e| e.to_string())?;
            Ok(Outcome::Ok(Some(value.to_string())))
        },
        CommandOp::PwmWrite => {
            let pin = int_arg(args, 0)?;
            let duty = int_arg(args, 1)?;
            let result = bridge
                .analog_write(pin, duty)
                .await
                .map_err(|e| e.to_string())?;
            if result == PWM_NOT_SUPPORTED {
                Ok(Outcome::DomainError("not a PWM pin".to_string()))
            } else {
                Ok(Outcome::Ok(None))
            }
        },
        CommandOp::I2cScan => {
            let result = bridge.i2c_scan().await.map_err(|e| e.to_string())?;
            Ok(Outcome::Ok(Some(result)))
        },
        CommandOp::I2cTransfer => {
            let addr = int_arg(args, 0)?;
            let rx_len = int_arg(args, 2)?;
            let result = bridge
                .i2c_transfer(addr, &args[1], rx_len)
                .await
                .map_err(|e| e.to_string())?;
            Ok(Outcome::Ok(Some(result)))
        },
        CommandOp::SpiTransfer => {
            let result = bridge
                .spi_transfer(&args[0])
                .await
                .map_err(|e| e.to_string())?;
            Ok(Outcome::Ok(Some(result)))
        },
        CommandOp::CanSend => {
            let can_id = int_arg(args, 0)?;
            let result = bridge
                .can_send(can_id, &args[1])
                .await
                .map_err(|e| e.to_string())?;
            if result == CAN_UNAVAILABLE {
                Ok(Outcome::DomainError("CAN not yet available".to_string()))
            } else {
                Ok(Outcome::Ok(None))
            }
        },
        CommandOp::LedMatrix => {
            bridge
                .led_matrix(&args[0])
                .await
                .map_err(|e| e.to_string())?;
            Ok(Outcome::Ok(None))
        },
        CommandOp::RgbLed => {
            let led_id = int_arg(args, 0)?;
            let r = int_arg(args, 1)?;
            let g = int_arg(args, 2)?;
            let b = int_arg(args, 3)?;
            let result = bridge
                .rgb_led(led_id, r, g, b)
                .await
                .map_err(|e| e.to_string())?;
            if result == RGB_UNKNOWN_LED {
                Ok(Outcome::DomainError(
                    "invalid LED id (use 3 or 4)".to_string(),
                ))
            } else {
                Ok(Outcome::Ok(None))
            }
        },
        CommandOp::Capabilities => {
            let result = bridge.capabilities().await.map_err(|e| e.to_string())?;
            Ok(Outcome::Ok(Some(result)))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_command;
    use crate::periph::MockBridge;
    use std::sync::Arc;

    fn cmd(line: &str) -> Command {
        parse_command(line.as_bytes()).expect("command")
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_gpio_write_invokes_adapter_and_acks() {
        let mock = Arc::new(MockBridge::new());
        let outcome = dispatch(mock.as_ref(), &cmd("gpio_write 5 1")).await;
        assert_eq!(outcome, Outcome::Ok(None));
        assert_eq!(outcome.render(), "ok\n");

        let calls = mock.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].op, "digital_write");
        assert_eq!(calls[0].args, vec!["5", "1"]);

        assert!(logs_contain("Dispatching gpio_write"));
    }

    #[tokio::test]
    async fn test_gpio_read_renders_value() {
        let mock = MockBridge::new().with_digital_read(1);
        let outcome = dispatch(&mock, &cmd("gpio_read 5")).await;
        assert_eq!(outcome.render(), "1\n");
    }

    #[tokio::test]
    async fn test_adc_read_renders_value() {
        let mock = MockBridge::new().with_analog_read(734);
        let outcome = dispatch(&mock, &cmd("adc_read 2")).await;
        assert_eq!(outcome.render(), "734\n");
        let calls = mock.calls().await;
        assert_eq!(calls[0].op, "analog_read");
        assert_eq!(calls[0].args, vec!["2"]);
    }

    #[tokio::test]
    async fn test_pwm_write_sentinel_maps_to_message() {
        let mock = MockBridge::new().with_analog_write_result(-1);
        let outcome = dispatch(&mock, &cmd("pwm_write 2 128")).await;
        assert_eq!(outcome.render(), "error: not a PWM pin\n");
        // The rejection comes from the one analogWrite call, nothing else
        assert_eq!(mock.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_pwm_write_success_is_ok() {
        let mock = MockBridge::new().with_analog_write_result(128);
        let outcome = dispatch(&mock, &cmd("pwm_write 9 128")).await;
        assert_eq!(outcome.render(), "ok\n");
    }

    #[tokio::test]
    async fn test_can_send_sentinel_maps_to_message() {
        let mock = MockBridge::new().with_can_send_result(-2);
        let outcome = dispatch(&mock, &cmd("can_send 100 DEADBEEF")).await;
        assert_eq!(outcome.render(), "error: CAN not yet available\n");
    }

    #[tokio::test]
    async fn test_rgb_led_sentinel_maps_to_message() {
        let mock = MockBridge::new().with_rgb_led_result(-1);
        let outcome = dispatch(&mock, &cmd("rgb_led 7 255 0 0")).await;
        assert_eq!(outcome.render(), "error: invalid LED id (use 3 or 4)\n");
    }

    #[tokio::test]
    async fn test_rgb_led_forwards_all_four_arguments() {
        let mock = MockBridge::new();
        let outcome = dispatch(&mock, &cmd("rgb_led 3 255 128 0")).await;
        assert_eq!(outcome.render(), "ok\n");
        let calls = mock.calls().await;
        assert_eq!(calls[0].op, "rgb_led");
        assert_eq!(calls[0].args, vec!["3", "255", "128", "0"]);
    }

    #[tokio::test]
    async fn test_i2c_transfer_keeps_argument_order() {
        let mock = MockBridge::new().with_transfer_result("00ff".to_string());
        let outcome = dispatch(&mock, &cmd("i2c_transfer 60 a0b1 2")).await;
        assert_eq!(outcome.render(), "00ff\n");
        let calls = mock.calls().await;
        assert_eq!(calls[0].op, "i2c_transfer");
        assert_eq!(calls[0].args, vec!["60", "a0b1", "2"]);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let mock = MockBridge::new();
        let outcome = dispatch(&mock, &cmd("reboot")).await;
        assert_eq!(outcome, Outcome::UnknownCommand);
        assert_eq!(outcome.render(), "error: unknown command\n");
        assert!(mock.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_short_arity_is_unknown_command() {
        let mock = MockBridge::new();
        // gpio_write needs two arguments
        let outcome = dispatch(&mock, &cmd("gpio_write 5")).await;
        assert_eq!(outcome, Outcome::UnknownCommand);
        assert!(mock.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_extra_arguments_are_tolerated() {
        let mock = MockBridge::new();
        let outcome = dispatch(&mock, &cmd("gpio_write 5 1 junk")).await;
        assert_eq!(outcome, Outcome::Ok(None));
    }

    #[tokio::test]
    async fn test_non_integer_argument_is_domain_error() {
        let mock = MockBridge::new();
        let outcome = dispatch(&mock, &cmd("gpio_write abc 1")).await;
        match outcome {
            Outcome::DomainError(message) => assert!(message.contains("invalid digit")),
            other => panic!("expected DomainError, got {:?}", other),
        }
        // Conversion fails before any adapter call is made
        assert!(mock.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_adapter_error_is_domain_error() {
        let mock = MockBridge::new().failing("i2c_scan", "bus fault");
        let outcome = dispatch(&mock, &cmd("i2c_scan")).await;
        match outcome {
            Outcome::DomainError(message) => assert!(message.contains("bus fault")),
            other => panic!("expected DomainError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_capabilities_renders_payload() {
        let mock = MockBridge::new().with_capabilities_result("{\"gpio\":true}".to_string());
        let outcome = dispatch(&mock, &cmd("capabilities")).await;
        assert_eq!(outcome.render(), "{\"gpio\":true}\n");
    }

    #[test]
    fn test_table_covers_every_operation() {
        assert_eq!(DISPATCH_TABLE.len(), 11);
        for entry in DISPATCH_TABLE {
            assert_eq!(entry.name, entry.name.to_lowercase());
        }
    }
}
