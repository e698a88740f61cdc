//! # Recibo CLI
//!
//! Command-line interface for bill printing.
//!
//! ## Usage
//!
//! ```bash
//! # Print the bill for order 42, using whichever method the POS server
//! # has configured (server driver or Bluetooth printer)
//! recibo print --api http://pos.local/api 42
//!
//! # List BLE peripherals in range, flagging known printer services
//! recibo scan
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use recibo::ble::BleBackend;
use recibo::{BillPrinter, BluetoothPrinter, HttpPosApi, PrintError, PrintMethod, SystemBle};

/// Recibo - bill printing utility
#[derive(Parser, Debug)]
#[command(name = "recibo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the bill for an order
    Print {
        /// Order identifier
        order: u64,

        /// Base URL of the point-of-sale API
        #[arg(long, default_value = "http://localhost:8080/api")]
        api: String,
    },

    /// Scan for BLE printers in range
    Scan,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("recibo=info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PrintError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Print { order, api } => {
            let printer = BillPrinter::new(
                HttpPosApi::new(api),
                BluetoothPrinter::new(SystemBle::init().await),
            );

            match printer.print_bill(order).await? {
                PrintMethod::Server => {
                    println!("Bill for order {} sent to the print service.", order);
                }
                PrintMethod::Bluetooth => {
                    println!("Bill for order {} printed via Bluetooth.", order);
                }
            }
        }

        Commands::Scan => {
            let ble = SystemBle::init().await;
            if !ble.is_available() {
                return Err(PrintError::UnsupportedTransport);
            }

            println!("Scanning for printers...");
            let discovered = ble.scan().await?;
            if discovered.is_empty() {
                println!("No BLE peripherals found.");
                return Ok(());
            }

            for printer in discovered {
                let marker = if printer.advertises_printer_service {
                    " [printer service]"
                } else {
                    ""
                };
                println!(
                    "  {}  {}  rssi={}{}",
                    printer.id,
                    printer.name.as_deref().unwrap_or("(unnamed)"),
                    printer
                        .rssi
                        .map(|r| r.to_string())
                        .unwrap_or_else(|| "?".to_string()),
                    marker
                );
            }
        }
    }

    Ok(())
}
