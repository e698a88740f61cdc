//! # Bluetooth Print Path
//!
//! Orchestrates a full print attempt against a directly paired BLE
//! printer: acquire a device (cached or freshly selected), connect,
//! resolve a writable characteristic, stream the payload in chunks, and
//! disconnect.
//!
//! ## Guarantees
//!
//! - One GATT connection per attempt, disconnected exactly once whether
//!   the attempt succeeds or fails.
//! - The device cache is set only after a fresh device prints
//!   successfully, and cleared on any failure while using a cached device.
//! - All platform errors leave this module already normalized into
//!   [`PrintError`] — no raw binding error names reach callers.
//!
//! ## Caller Obligation
//!
//! Concurrent print attempts against the same printer would interleave
//! chunk writes on the physical link. The surrounding application must
//! serialize prints (e.g. disable the print action while one is in
//! flight); this module does not provide that mutual exclusion.

pub mod cache;
pub mod gatt;
pub mod platform;
pub mod resolve;
pub mod writer;

pub use cache::DeviceCache;
pub use gatt::{BleBackend, CharacteristicProps, GattCharacteristic, GattService, GattSession, WriteMode};
pub use platform::{DiscoveredPrinter, SystemBle};

use tracing::{debug, info, warn};

use crate::error::PrintError;

/// The Bluetooth transport for bill printing.
///
/// Generic over the backend so the whole path runs unmodified against the
/// real `btleplug` stack or a scripted fake in tests.
pub struct BluetoothPrinter<B: BleBackend> {
    backend: B,
    cache: DeviceCache<B::Device>,
}

impl<B: BleBackend> BluetoothPrinter<B> {
    pub fn new(backend: B) -> Self {
        Self::with_cache(backend, DeviceCache::new())
    }

    /// Build with an externally scoped cache.
    pub fn with_cache(backend: B, cache: DeviceCache<B::Device>) -> Self {
        Self { backend, cache }
    }

    /// Whether BLE printing is possible on this host at all.
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// The device the next print will try first, if any.
    pub fn cached_device(&self) -> Option<B::Device> {
        self.cache.get()
    }

    /// Send a fully rendered printer-control buffer to the printer.
    ///
    /// Tries the remembered device first. If that fails anywhere
    /// (connect, resolve, or write), the cache is cleared and device
    /// selection runs again; a fresh device that prints successfully
    /// becomes the new remembered device. There is no automatic retry
    /// beyond that single cached-to-fresh fallback.
    pub async fn print(&self, data: &[u8]) -> Result<(), PrintError> {
        if let Some(device) = self.cache.get() {
            debug!("trying remembered printer");
            match self.transmit(&device, data).await {
                Ok(()) => return Ok(()),
                Err(error) => {
                    warn!(%error, "remembered printer failed, forgetting it");
                    self.cache.clear();
                }
            }
        }

        let device = self.backend.choose_device().await?;
        self.transmit(&device, data).await?;
        self.cache.set(device);
        info!(bytes = data.len(), "bill sent to printer");
        Ok(())
    }

    /// One connect-resolve-write cycle with unconditional teardown.
    async fn transmit(&self, device: &B::Device, data: &[u8]) -> Result<(), PrintError> {
        let session = self.backend.connect(device).await?;
        let outcome = send(&session, data).await;

        // The session is torn down on both paths. A disconnect error after
        // a settled send does not change the attempt's outcome.
        if let Err(error) = session.disconnect().await {
            debug!(%error, "disconnect after print attempt failed");
        }

        outcome
    }
}

async fn send<S: GattSession>(session: &S, data: &[u8]) -> Result<(), PrintError> {
    let services = session.services();
    let target = resolve::resolve_writable(&services)?;
    writer::write_chunked(session, &target, data).await
}
