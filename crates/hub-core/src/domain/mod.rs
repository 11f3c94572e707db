//! Device-inventory domain records.
//!
//! Pure data types mirroring what the hub's inventory endpoints return.
//! No I/O, no async, no framework types — the console's HTTP adapter
//! deserialises into these and the pairing agent reads them back when
//! reconciling a pending exchange against the latest snapshot.

pub mod device;

pub use device::{
    address_from_path, BluetoothDevice, BtInventory, HidDevice, HidFilter, HidInventory,
};
