//! Hexadecimal utilities
//!
//! Conversions between byte buffers and the hex-string arguments used on
//! the command wire (I2C/SPI payloads, LED matrix bitmaps).
//!
//! # Examples
//!
//! ```rust
//! use common::hex::{bytes_to_hex, hex_to_bytes};
//!
//! let data = &[0x01, 0x02, 0xFF];
//! assert_eq!(bytes_to_hex(data), "0102ff");
//! assert_eq!(hex_to_bytes("0102FF").unwrap(), vec![0x01, 0x02, 0xFF]);
//! ```

use crate::error::{BridgeError, Result};

/// Convert a byte slice to a lowercase hexadecimal string
pub fn bytes_to_hex(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Convert a hexadecimal string to a byte vector
///
/// Accepts upper- or lowercase digits. Rejects odd-length input and any
/// non-hex character.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return Err(BridgeError::invalid_parameter(format!(
            "odd-length hex string ({} chars)",
            hex.len()
        )));
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let pair = &hex[i..i + 2];
        let byte = u8::from_str_radix(pair, 16).map_err(|_| {
            BridgeError::invalid_parameter(format!("invalid hex byte '{}' at offset {}", pair, i))
        })?;
        bytes.push(byte);
    }
    Ok(bytes)
}
