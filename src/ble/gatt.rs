//! # GATT Model and Backend Seam
//!
//! Lightweight service/characteristic types plus the two traits the print
//! path is written against. The real implementation lives in
//! [`super::platform`] on top of `btleplug`; tests drive the same code
//! with scripted fakes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::PrintError;

/// BLE write semantics for a characteristic value write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Acknowledged write. Slower, but the peer confirms each value.
    WithResponse,
    /// Unacknowledged write. Higher throughput; needs external pacing
    /// because the link gives no application-level flow control.
    WithoutResponse,
}

/// The write-relevant subset of GATT characteristic properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacteristicProps {
    pub write: bool,
    pub write_without_response: bool,
}

impl CharacteristicProps {
    pub fn writable(&self) -> bool {
        self.write || self.write_without_response
    }

    /// Pick the write mode once per transmission: without-response when the
    /// printer supports it, else acknowledged writes.
    pub fn preferred_write_mode(&self) -> Option<WriteMode> {
        if self.write_without_response {
            Some(WriteMode::WithoutResponse)
        } else if self.write {
            Some(WriteMode::WithResponse)
        } else {
            None
        }
    }
}

/// A characteristic on a connected device, identified by service + UUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GattCharacteristic {
    pub service: Uuid,
    pub uuid: Uuid,
    pub props: CharacteristicProps,
}

/// A discovered GATT service with its characteristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GattService {
    pub uuid: Uuid,
    pub primary: bool,
    pub characteristics: Vec<GattCharacteristic>,
}

/// An open GATT connection to one printer.
///
/// A session is exclusively owned by a single print attempt and torn down
/// (disconnected) before that attempt returns, on success and failure
/// alike.
#[async_trait]
pub trait GattSession: Send + Sync {
    /// Services discovered on the connected device.
    fn services(&self) -> Vec<GattService>;

    /// Write one value chunk to a characteristic.
    async fn write(
        &self,
        characteristic: &GattCharacteristic,
        chunk: &[u8],
        mode: WriteMode,
    ) -> Result<(), PrintError>;

    /// Close the connection. Must be safe to call on an already-dropped link.
    async fn disconnect(&self) -> Result<(), PrintError>;
}

/// Host BLE capabilities: availability probe, device selection, connect.
#[async_trait]
pub trait BleBackend: Send + Sync {
    /// Opaque handle to a physical peripheral. Valid only for the lifetime
    /// of the backend; never serialized.
    type Device: Clone + Send + Sync;
    type Session: GattSession;

    /// Synchronous, side-effect-free capability check of the host runtime.
    fn is_available(&self) -> bool;

    /// Run device selection and return a handle, or
    /// [`PrintError::DeviceNotFound`] when nothing suitable turns up.
    async fn choose_device(&self) -> Result<Self::Device, PrintError>;

    /// Open a GATT connection to a previously selected device.
    async fn connect(&self, device: &Self::Device) -> Result<Self::Session, PrintError>;
}
