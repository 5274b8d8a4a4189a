//! Common utilities for catalog-cmd

use anyhow::{Result, bail};

/// Formats bytes as lowercase hex pairs separated by spaces.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses hex text, ignoring whitespace and an optional `0x` prefix.
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    let digits: String = text.split_whitespace().collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);
    if !digits.is_ascii() {
        bail!("Input is not hex text");
    }
    if digits.len() % 2 != 0 {
        bail!("Odd number of hex digits: {}", digits.len());
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            let pair = &digits[i..i + 2];
            u8::from_str_radix(pair, 16)
                .map_err(|_| anyhow::anyhow!("Invalid hex byte: {pair}"))
        })
        .collect()
}
