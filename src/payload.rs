//! Bill payload decoding.
//!
//! The server renders the full printer-control stream (ESC/POS commands
//! plus text) and ships it as base64. This module turns that string back
//! into raw bytes before any device I/O starts, so a corrupt payload
//! never wastes a connection attempt.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::PrintError;

/// Decode a base64 bill payload into raw printer bytes.
pub fn decode(encoded: &str) -> Result<Vec<u8>, PrintError> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| PrintError::PayloadDecode(e.to_string()))
}
