//! # System BLE Backend
//!
//! [`BleBackend`] implementation on top of `btleplug`.
//!
//! The browser-style user-facing device chooser becomes a bounded
//! discovery window here: scan, then pick the strongest candidate that
//! advertises a known printer service, falling back to the strongest
//! named peripheral. An empty window surfaces as
//! [`PrintError::DeviceNotFound`], the same category as a dismissed
//! chooser.
//!
//! Connect and write calls carry no internal deadline; failures surface
//! through the platform binding's own error reporting.

use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{Central, CharPropFlags, Manager as _, Peripheral as _, ScanFilter, WriteType};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tracing::{debug, info, warn};

use crate::error::{PrintError, classify_ble_error};

use super::gatt::{
    BleBackend, CharacteristicProps, GattCharacteristic, GattService, GattSession, WriteMode,
};
use super::resolve;

/// How long discovery listens for advertisements before picking a device.
pub const DISCOVERY_WINDOW: Duration = Duration::from_secs(10);

/// A peripheral seen during a diagnostic scan.
#[derive(Debug, Clone)]
pub struct DiscoveredPrinter {
    pub id: String,
    pub name: Option<String>,
    pub rssi: Option<i16>,
    /// Whether the advertisement carried a known printer service UUID.
    pub advertises_printer_service: bool,
}

/// The host Bluetooth stack, or the lack of one.
pub struct SystemBle {
    adapter: Option<Adapter>,
}

impl SystemBle {
    /// Probe the host for a BLE adapter. Never fails: a host without
    /// Bluetooth yields a backend that reports unavailable, so the
    /// dispatcher can refuse the Bluetooth method cleanly.
    pub async fn init() -> Self {
        let adapter = match Manager::new().await {
            Ok(manager) => match manager.adapters().await {
                Ok(mut adapters) if !adapters.is_empty() => Some(adapters.remove(0)),
                Ok(_) => {
                    warn!("no Bluetooth adapters on this host");
                    None
                }
                Err(error) => {
                    warn!(%error, "failed to enumerate Bluetooth adapters");
                    None
                }
            },
            Err(error) => {
                warn!(%error, "no Bluetooth manager on this host");
                None
            }
        };
        Self { adapter }
    }

    fn adapter(&self) -> Result<&Adapter, PrintError> {
        self.adapter.as_ref().ok_or(PrintError::UnsupportedTransport)
    }

    /// Diagnostic scan: list everything in range with printer-service
    /// matches flagged. Used by the `scan` CLI subcommand.
    pub async fn scan(&self) -> Result<Vec<DiscoveredPrinter>, PrintError> {
        let adapter = self.adapter()?;
        adapter
            .start_scan(ScanFilter::default())
            .await
            .map_err(classify_ble_error)?;
        tokio::time::sleep(DISCOVERY_WINDOW).await;
        let peripherals = adapter.peripherals().await.map_err(classify_ble_error)?;
        stop_scan_quietly(adapter).await;

        let mut discovered = Vec::new();
        for peripheral in peripherals {
            let Ok(Some(properties)) = peripheral.properties().await else {
                continue;
            };
            discovered.push(DiscoveredPrinter {
                id: peripheral.id().to_string(),
                name: properties.local_name,
                rssi: properties.rssi,
                advertises_printer_service: properties
                    .services
                    .iter()
                    .any(resolve::is_known_printer_service),
            });
        }
        discovered.sort_by_key(|p| std::cmp::Reverse(p.rssi.unwrap_or(i16::MIN)));
        Ok(discovered)
    }
}

#[async_trait]
impl BleBackend for SystemBle {
    type Device = Peripheral;
    type Session = SystemSession;

    fn is_available(&self) -> bool {
        self.adapter.is_some()
    }

    async fn choose_device(&self) -> Result<Peripheral, PrintError> {
        let adapter = self.adapter()?;
        info!(window = ?DISCOVERY_WINDOW, "scanning for printers");
        adapter
            .start_scan(ScanFilter::default())
            .await
            .map_err(classify_ble_error)?;
        tokio::time::sleep(DISCOVERY_WINDOW).await;
        let peripherals = adapter.peripherals().await.map_err(classify_ble_error)?;
        stop_scan_quietly(adapter).await;

        // Prefer the strongest peripheral advertising a known printer
        // service; otherwise take the strongest one with a local name.
        let mut best_known: Option<(i16, Peripheral)> = None;
        let mut best_named: Option<(i16, Peripheral)> = None;
        for peripheral in peripherals {
            let Ok(Some(properties)) = peripheral.properties().await else {
                continue;
            };
            let rssi = properties.rssi.unwrap_or(i16::MIN);
            let knows_service = properties
                .services
                .iter()
                .any(resolve::is_known_printer_service);

            if knows_service && best_known.as_ref().is_none_or(|(best, _)| rssi > *best) {
                best_known = Some((rssi, peripheral.clone()));
            }
            if properties.local_name.is_some()
                && best_named.as_ref().is_none_or(|(best, _)| rssi > *best)
            {
                best_named = Some((rssi, peripheral));
            }
        }

        let chosen = best_known
            .or(best_named)
            .map(|(_, peripheral)| peripheral)
            .ok_or(PrintError::DeviceNotFound)?;
        info!(device = %chosen.id(), "selected printer");
        Ok(chosen)
    }

    async fn connect(&self, device: &Peripheral) -> Result<SystemSession, PrintError> {
        if !device.is_connected().await.map_err(classify_ble_error)? {
            device.connect().await.map_err(classify_ble_error)?;
        }
        device
            .discover_services()
            .await
            .map_err(classify_ble_error)?;
        debug!(device = %device.id(), "GATT session open");
        Ok(SystemSession {
            peripheral: device.clone(),
        })
    }
}

async fn stop_scan_quietly(adapter: &Adapter) {
    if let Err(error) = adapter.stop_scan().await {
        debug!(%error, "failed to stop scan cleanly");
    }
}

/// An open GATT connection to a real peripheral.
pub struct SystemSession {
    peripheral: Peripheral,
}

#[async_trait]
impl GattSession for SystemSession {
    fn services(&self) -> Vec<GattService> {
        self.peripheral
            .services()
            .iter()
            .map(|service| GattService {
                uuid: service.uuid,
                primary: service.primary,
                characteristics: service
                    .characteristics
                    .iter()
                    .map(|characteristic| GattCharacteristic {
                        service: service.uuid,
                        uuid: characteristic.uuid,
                        props: CharacteristicProps {
                            write: characteristic.properties.contains(CharPropFlags::WRITE),
                            write_without_response: characteristic
                                .properties
                                .contains(CharPropFlags::WRITE_WITHOUT_RESPONSE),
                        },
                    })
                    .collect(),
            })
            .collect()
    }

    async fn write(
        &self,
        characteristic: &GattCharacteristic,
        chunk: &[u8],
        mode: WriteMode,
    ) -> Result<(), PrintError> {
        let target = self
            .peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == characteristic.uuid && c.service_uuid == characteristic.service)
            .ok_or(PrintError::NoWritableCharacteristic)?;
        let write_type = match mode {
            WriteMode::WithResponse => WriteType::WithResponse,
            WriteMode::WithoutResponse => WriteType::WithoutResponse,
        };
        self.peripheral
            .write(&target, chunk, write_type)
            .await
            .map_err(classify_ble_error)
    }

    async fn disconnect(&self) -> Result<(), PrintError> {
        if self.peripheral.is_connected().await.map_err(classify_ble_error)? {
            self.peripheral.disconnect().await.map_err(classify_ble_error)?;
        }
        debug!(device = %self.peripheral.id(), "GATT session closed");
        Ok(())
    }
}

// Real-hardware behaviour (scan windows, connect, chunk delivery) can only
// be exercised manually with a printer in range; the trait seam above is
// what the automated tests drive instead.
