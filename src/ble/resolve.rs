//! # Writable Characteristic Resolution
//!
//! Consumer thermal printers expose no single standard BLE profile: some
//! use the 0x18F0 ESC/POS service, some the ISSC transparent UART, some a
//! vendor 0xFFxx service, and some invent their own. Resolution is an
//! ordered list of strategies, short-circuited on the first hit:
//!
//! 1. known service UUIDs x known characteristic UUIDs, in priority order;
//! 2. exhaustive scan of every service for any write-capable characteristic.
//!
//! The fast path avoids a full enumeration on common hardware; the
//! exhaustive fallback keeps unknown printers working.

use uuid::{Uuid, uuid};

use crate::error::PrintError;

use super::gatt::{GattCharacteristic, GattService};

/// Vendor-common printer services with their usual write characteristics,
/// in priority order.
const KNOWN_TARGETS: &[(Uuid, &[Uuid])] = &[
    // ESC/POS-over-BLE service used by many generic thermal printers.
    (
        uuid!("000018f0-0000-1000-8000-00805f9b34fb"),
        &[uuid!("00002af1-0000-1000-8000-00805f9b34fb")],
    ),
    // ISSC/Microchip transparent UART, common in printer BLE modules.
    (
        uuid!("49535343-fe7d-4ae5-8fa9-9fafd205e455"),
        &[
            uuid!("49535343-8841-43f4-a8d4-ecbe34729bb3"),
            uuid!("49535343-aca3-481c-91ec-d85e28a60318"),
        ],
    ),
    // Generic vendor serial service on cheap BLE-to-UART bridges.
    (
        uuid!("0000ff00-0000-1000-8000-00805f9b34fb"),
        &[
            uuid!("0000ff02-0000-1000-8000-00805f9b34fb"),
            uuid!("0000ff01-0000-1000-8000-00805f9b34fb"),
        ],
    ),
];

type Strategy = fn(&[GattService]) -> Option<GattCharacteristic>;

/// Resolution strategies in evaluation order.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("known-uuid", known_uuid_pair),
    ("exhaustive", any_writable),
];

/// Find a write-capable characteristic on a connected printer.
pub fn resolve_writable(services: &[GattService]) -> Result<GattCharacteristic, PrintError> {
    for (name, strategy) in STRATEGIES {
        if let Some(found) = strategy(services) {
            tracing::debug!(
                strategy = name,
                service = %found.service,
                characteristic = %found.uuid,
                "resolved writable characteristic"
            );
            return Ok(found);
        }
    }
    Err(PrintError::NoWritableCharacteristic)
}

/// Fast path: known service/characteristic pairs in priority order.
fn known_uuid_pair(services: &[GattService]) -> Option<GattCharacteristic> {
    for (service_uuid, characteristic_uuids) in KNOWN_TARGETS {
        let Some(service) = services.iter().find(|s| s.uuid == *service_uuid) else {
            continue;
        };
        for wanted in *characteristic_uuids {
            if let Some(found) = service
                .characteristics
                .iter()
                .find(|c| c.uuid == *wanted && c.props.writable())
            {
                return Some(found.clone());
            }
        }
    }
    None
}

/// Fallback: first write-capable characteristic anywhere on the device.
fn any_writable(services: &[GattService]) -> Option<GattCharacteristic> {
    services
        .iter()
        .flat_map(|service| service.characteristics.iter())
        .find(|c| c.props.writable())
        .cloned()
}

/// Service UUIDs worth advertising for during device discovery.
pub fn known_printer_services() -> Vec<Uuid> {
    KNOWN_TARGETS.iter().map(|(service, _)| *service).collect()
}

/// Whether an advertised service UUID belongs to a known printer profile.
pub fn is_known_printer_service(uuid: &Uuid) -> bool {
    KNOWN_TARGETS.iter().any(|(service, _)| service == uuid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::gatt::CharacteristicProps;
    use pretty_assertions::assert_eq;

    const ESCPOS_SERVICE: Uuid = uuid!("000018f0-0000-1000-8000-00805f9b34fb");
    const ESCPOS_WRITE: Uuid = uuid!("00002af1-0000-1000-8000-00805f9b34fb");
    const VENDOR_SERVICE: Uuid = uuid!("0000ff00-0000-1000-8000-00805f9b34fb");
    const VENDOR_WRITE: Uuid = uuid!("0000ff02-0000-1000-8000-00805f9b34fb");

    fn characteristic(
        service: Uuid,
        uuid: Uuid,
        write: bool,
        write_without_response: bool,
    ) -> GattCharacteristic {
        GattCharacteristic {
            service,
            uuid,
            props: CharacteristicProps {
                write,
                write_without_response,
            },
        }
    }

    fn service(uuid: Uuid, characteristics: Vec<GattCharacteristic>) -> GattService {
        GattService {
            uuid,
            primary: true,
            characteristics,
        }
    }

    #[test]
    fn known_pair_wins_over_other_writable_characteristics() {
        let decoy = uuid!("0000beef-0000-1000-8000-00805f9b34fb");
        let services = vec![
            service(decoy, vec![characteristic(decoy, decoy, true, false)]),
            service(
                ESCPOS_SERVICE,
                vec![characteristic(ESCPOS_SERVICE, ESCPOS_WRITE, false, true)],
            ),
        ];

        let resolved = resolve_writable(&services).unwrap();
        assert_eq!(ESCPOS_WRITE, resolved.uuid);
    }

    #[test]
    fn known_services_are_tried_in_priority_order() {
        let services = vec![
            service(
                VENDOR_SERVICE,
                vec![characteristic(VENDOR_SERVICE, VENDOR_WRITE, true, false)],
            ),
            service(
                ESCPOS_SERVICE,
                vec![characteristic(ESCPOS_SERVICE, ESCPOS_WRITE, true, false)],
            ),
        ];

        // 18F0 outranks FF00 regardless of discovery order.
        let resolved = resolve_writable(&services).unwrap();
        assert_eq!(ESCPOS_WRITE, resolved.uuid);
    }

    #[test]
    fn known_characteristic_without_write_property_is_skipped() {
        let services = vec![service(
            ESCPOS_SERVICE,
            vec![
                characteristic(ESCPOS_SERVICE, ESCPOS_WRITE, false, false),
                characteristic(
                    ESCPOS_SERVICE,
                    uuid!("0000cafe-0000-1000-8000-00805f9b34fb"),
                    true,
                    false,
                ),
            ],
        )];

        // Fast path rejects the read-only 2AF1; exhaustive scan finds the other.
        let resolved = resolve_writable(&services).unwrap();
        assert_eq!(
            uuid!("0000cafe-0000-1000-8000-00805f9b34fb"),
            resolved.uuid
        );
    }

    #[test]
    fn exhaustive_scan_handles_fully_unknown_hardware() {
        let odd_service = uuid!("c0de0001-1234-5678-9abc-def012345678");
        let odd_write = uuid!("c0de0002-1234-5678-9abc-def012345678");
        let services = vec![service(
            odd_service,
            vec![
                characteristic(odd_service, uuid!("c0de0003-1234-5678-9abc-def012345678"), false, false),
                characteristic(odd_service, odd_write, false, true),
            ],
        )];

        let resolved = resolve_writable(&services).unwrap();
        assert_eq!(odd_write, resolved.uuid);
    }

    #[test]
    fn no_writable_characteristic_anywhere_fails() {
        let services = vec![service(
            ESCPOS_SERVICE,
            vec![characteristic(ESCPOS_SERVICE, ESCPOS_WRITE, false, false)],
        )];

        assert!(matches!(
            resolve_writable(&services),
            Err(PrintError::NoWritableCharacteristic)
        ));
    }

    #[test]
    fn empty_device_fails() {
        assert!(matches!(
            resolve_writable(&[]),
            Err(PrintError::NoWritableCharacteristic)
        ));
    }

    #[test]
    fn known_service_lookup() {
        assert!(is_known_printer_service(&ESCPOS_SERVICE));
        assert!(!is_known_printer_service(
            &uuid!("0000180f-0000-1000-8000-00805f9b34fb")
        ));
        assert_eq!(3, known_printer_services().len());
    }
}
