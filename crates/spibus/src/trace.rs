//! Recorded port activity.
//!
//! A trace is a text file of port B snapshots, one hex byte per token.
//! Tokens are separated by whitespace or commas and may carry a `0x` or
//! `$` prefix; `#` comments out the rest of a line.
//!
//! ```text
//! # handshake, then select the SD card
//! 0e 0f 0e 0f
//! $8C $8D
//! ```
use std::path::Path;

use anyhow::{Context, Result};

pub fn parse_trace(text: &str) -> Result<Vec<u8>> {
    let mut samples = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        for token in line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .or_else(|| token.strip_prefix('$'))
                .unwrap_or(token);
            let value = u8::from_str_radix(digits, 16)
                .with_context(|| format!("line {}: invalid port sample '{}'", line_no + 1, token))?;
            samples.push(value);
        }
    }
    Ok(samples)
}

pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read trace '{}'", path.display()))?;
    parse_trace(&text).with_context(|| format!("in trace '{}'", path.display()))
}
