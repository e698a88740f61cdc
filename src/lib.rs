//! # Recibo - Bill Printing Client
//!
//! Recibo delivers a pre-rendered bill (an opaque ESC/POS byte stream,
//! produced server-side) to a thermal receipt printer over one of two
//! transports:
//!
//! - **Server**: one RPC to a server-resident printer driver.
//! - **Bluetooth**: a directly paired BLE printer driven from this
//!   process — device discovery, GATT characteristic resolution with a
//!   known-UUID fast path and exhaustive fallback, MTU-safe chunked
//!   writes with pacing, and a single-slot device cache so the user is
//!   not re-prompted on every print.
//!
//! ## Quick Start
//!
//! ```no_run
//! use recibo::{BillPrinter, BluetoothPrinter, HttpPosApi, SystemBle};
//!
//! # async fn example() -> Result<(), recibo::PrintError> {
//! let api = HttpPosApi::new("http://pos.local/api");
//! let bluetooth = BluetoothPrinter::new(SystemBle::init().await);
//! let printer = BillPrinter::new(api, bluetooth);
//!
//! let method = printer.print_bill(42).await?;
//! println!("printed via {method}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dispatch`] | Print method routing (`print_bill`) |
//! | [`ble`] | Bluetooth print path: discovery, GATT, chunked writes |
//! | [`api`] | Point-of-sale server collaborators |
//! | [`payload`] | Base64 bill payload decoding |
//! | [`error`] | The closed error taxonomy shown to users |
//!
//! ## Concurrency
//!
//! One print attempt at a time. The device cache is deliberately
//! unsynchronized across attempts; callers must not run two prints
//! concurrently (see [`ble`]).

pub mod api;
pub mod ble;
pub mod dispatch;
pub mod error;
pub mod payload;

// Re-exports for convenience
pub use api::{HttpPosApi, PosApi, PrintMethod};
pub use ble::{BluetoothPrinter, SystemBle};
pub use dispatch::BillPrinter;
pub use error::PrintError;
