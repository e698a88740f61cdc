//! # Error Types
//!
//! One closed error taxonomy for the whole print path. The UI layer is
//! expected to show `error.to_string()` directly, so every variant carries
//! a remediation hint instead of a platform exception name.

use thiserror::Error;

/// Main error type for recibo operations.
#[derive(Debug, Error)]
pub enum PrintError {
    /// Bluetooth printing was configured but the host has no usable adapter.
    #[error(
        "Bluetooth printing is not available on this machine. \
         Switch the print method to the networked print service."
    )]
    UnsupportedTransport,

    /// The base64 bill payload from the server could not be decoded.
    #[error("The rendered bill could not be decoded ({0}). Re-fetch the bill and print again.")]
    PayloadDecode(String),

    /// Device selection found nothing within the discovery window.
    #[error(
        "No printer was found. Make sure the printer is powered on and in range, \
         then print again."
    )]
    DeviceNotFound,

    /// The operating system denied Bluetooth access.
    #[error(
        "Bluetooth access was denied by the operating system. \
         Grant Bluetooth permission and print again."
    )]
    Permission,

    /// Transient BLE link failure during connect or write.
    #[error(
        "The Bluetooth link to the printer dropped ({0}). \
         Move closer to the printer and print again."
    )]
    Link(String),

    /// Exhaustive characteristic search found no write-capable sink.
    #[error(
        "This printer exposes no writable Bluetooth characteristic. \
         Use the networked print service for this printer."
    )]
    NoWritableCharacteristic,

    /// A chunk write failed mid-transmission. The printout may be partial;
    /// the whole print must be retried, not resumed.
    #[error("Sending data to the printer failed mid-print ({0}). Retry the whole print.")]
    WriteFailed(String),

    /// Server-side print dispatch rejected the job. The message is the
    /// server's own, passed through unchanged.
    #[error("{0}")]
    Server(String),

    /// The point-of-sale API could not be reached or returned garbage.
    #[error("Could not reach the point-of-sale service: {0}")]
    Api(String),
}

/// Map a platform BLE error onto the taxonomy above.
///
/// This is the single place where `btleplug` failure identities are
/// interpreted; extend the match here when new printer/platform quirks
/// show up.
pub fn classify_ble_error(error: btleplug::Error) -> PrintError {
    use btleplug::Error as Ble;

    match error {
        Ble::PermissionDenied => PrintError::Permission,
        Ble::DeviceNotFound => PrintError::DeviceNotFound,
        Ble::NotConnected => PrintError::Link("not connected".to_string()),
        Ble::TimedOut(duration) => PrintError::Link(format!("timed out after {duration:?}")),
        other => PrintError::Link(other.to_string()),
    }
}
