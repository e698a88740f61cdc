//! # Print Method Dispatch
//!
//! The single entry point the rest of the application calls:
//! [`BillPrinter::print_bill`]. Reads the configured print method fresh
//! on every call, then routes to either the server-resident printer
//! driver (one RPC) or the local Bluetooth print path.

use tracing::info;

use crate::api::{PosApi, PrintMethod};
use crate::ble::{BleBackend, BluetoothPrinter};
use crate::error::PrintError;
use crate::payload;

/// Routes a bill print to the configured transport.
pub struct BillPrinter<A: PosApi, B: BleBackend> {
    api: A,
    bluetooth: BluetoothPrinter<B>,
}

impl<A: PosApi, B: BleBackend> BillPrinter<A, B> {
    pub fn new(api: A, bluetooth: BluetoothPrinter<B>) -> Self {
        Self { api, bluetooth }
    }

    /// The underlying Bluetooth path (device cache inspection, probes).
    pub fn bluetooth(&self) -> &BluetoothPrinter<B> {
        &self.bluetooth
    }

    /// Print the bill for one order and report which transport ran.
    ///
    /// The method is re-read from the settings endpoint on every call so
    /// an administrator's change applies to the next print without a
    /// restart. No retries happen here — retry is the user pressing
    /// print again.
    pub async fn print_bill(&self, order_id: u64) -> Result<PrintMethod, PrintError> {
        let method = self.api.print_method().await?;
        info!(order_id, %method, "dispatching bill print");

        match method {
            PrintMethod::Server => {
                self.api.dispatch_print(order_id).await?;
            }
            PrintMethod::Bluetooth => {
                // Refuse up front on hosts without BLE instead of letting
                // discovery fail with a confusing platform error.
                if !self.bluetooth.is_available() {
                    return Err(PrintError::UnsupportedTransport);
                }
                let encoded = self.api.bill_payload(order_id).await?;
                let data = payload::decode(&encoded)?;
                self.bluetooth.print(&data).await?;
            }
        }

        Ok(method)
    }
}
