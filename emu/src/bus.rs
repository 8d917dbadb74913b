//! # Memory Bus
//!
//! Every access the core makes, instruction fetches included, goes through
//! [`Bus`]. The bus owns an ordered list of [`IoDevice`]s fixed at
//! construction and routes each access to the first device whose
//! `contains` accepts it:
//!
//! ```text
//!   read/write(address, width)
//!            │
//!            ▼
//!   devices[0].contains? ── yes ──► devices[0] serves it
//!            │ no
//!            ▼
//!   devices[1].contains? ── yes ──► devices[1] serves it
//!            │ no
//!            ▼
//!           ...
//!            │ no
//!            ▼
//!   EmuError::UnmappedAddress
//! ```
//!
//! The scan is linear in the number of devices. Machines built on this core
//! have a handful of devices, so no range index is kept. Overlapping ranges
//! are not rejected: registration order decides who wins.

pub use crate::memory::io_device::{IoDevice, Width};

use crate::error::EmuError;

pub struct Bus {
    devices: Vec<Box<dyn IoDevice>>,
}

impl Bus {
    #[must_use]
    pub fn new(devices: Vec<Box<dyn IoDevice>>) -> Self {
        Self { devices }
    }

    /// Names of the attached devices in registration order.
    pub fn device_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.devices.iter().map(|device| device.name())
    }

    pub fn read(&self, address: u32, width: Width) -> Result<u32, EmuError> {
        self.devices
            .iter()
            .find(|device| device.contains(address, width))
            .ok_or(EmuError::UnmappedAddress { address, width })?
            .read_at(address, width)
    }

    pub fn write(&mut self, address: u32, width: Width, value: u32) -> Result<(), EmuError> {
        self.devices
            .iter_mut()
            .find(|device| device.contains(address, width))
            .ok_or(EmuError::UnmappedAddress { address, width })?
            .write_at(address, width, value)
    }

    pub fn read_word(&self, address: u32) -> Result<u32, EmuError> {
        self.read(address, Width::Word)
    }

    pub fn read_half_word(&self, address: u32) -> Result<u16, EmuError> {
        self.read(address, Width::HalfWord).map(|v| v as u16)
    }

    pub fn read_byte(&self, address: u32) -> Result<u8, EmuError> {
        self.read(address, Width::Byte).map(|v| v as u8)
    }

    pub fn write_word(&mut self, address: u32, value: u32) -> Result<(), EmuError> {
        self.write(address, Width::Word, value)
    }

    pub fn write_half_word(&mut self, address: u32, value: u16) -> Result<(), EmuError> {
        self.write(address, Width::HalfWord, value.into())
    }

    pub fn write_byte(&mut self, address: u32, value: u8) -> Result<(), EmuError> {
        self.write(address, Width::Byte, value.into())
    }
}
