//! # Point-of-Sale Collaborators
//!
//! The print path talks to three small server endpoints: the settings
//! endpoint (which transport to use), the print-data endpoint (the
//! pre-rendered bill as base64), and the print-dispatch endpoint (the
//! server-resident printer driver). This module defines the trait seam;
//! [`http`] carries the real `reqwest` client.

pub mod http;

pub use http::HttpPosApi;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PrintError;

/// Which transport the administrator configured for bill printing.
///
/// Fetched fresh on every print call and never cached here, so a
/// configuration change takes effect on the very next print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintMethod {
    /// Server-resident printer driver, reached by one RPC.
    Server,
    /// Directly paired BLE printer, driven from this process.
    Bluetooth,
}

impl fmt::Display for PrintMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintMethod::Server => write!(f, "server"),
            PrintMethod::Bluetooth => write!(f, "bluetooth"),
        }
    }
}

/// The point-of-sale server endpoints the dispatcher depends on.
#[async_trait]
pub trait PosApi: Send + Sync {
    /// Read the currently configured print method.
    async fn print_method(&self) -> Result<PrintMethod, PrintError>;

    /// Fetch the fully rendered bill for an order, base64-encoded.
    async fn bill_payload(&self, order_id: u64) -> Result<String, PrintError>;

    /// Ask the server-side printer driver to print an order's bill.
    /// Server rejections pass through as [`PrintError::Server`] with the
    /// server's own message.
    async fn dispatch_print(&self, order_id: u64) -> Result<(), PrintError>;
}
