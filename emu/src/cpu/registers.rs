//! # Register File
//!
//! The 16 general-purpose registers.
//!
//! - **R0-R12**: General purpose
//! - **R13 (SP)**: Stack pointer (by convention)
//! - **R14 (LR)**: Link register (return address)
//! - **R15 (PC)**: Program counter
//!
//! The PC is moved past an instruction as soon as it is fetched, so while an
//! instruction executes R15 already holds the address of the next one.

use serde::{Deserialize, Serialize};

/// Program Counter register index.
pub const REG_PROGRAM_COUNTER: usize = 0xF;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers([u32; 16]);

impl Registers {
    #[must_use]
    pub const fn program_counter(&self) -> u32 {
        self.0[REG_PROGRAM_COUNTER]
    }

    pub const fn set_program_counter(&mut self, new_value: u32) {
        self.0[REG_PROGRAM_COUNTER] = new_value;
    }

    pub const fn advance_program_counter(&mut self, bytes: u32) {
        self.0[REG_PROGRAM_COUNTER] = self.0[REG_PROGRAM_COUNTER].wrapping_add(bytes);
    }

    /// Clears the PC bits below `alignment` (a power of two).
    pub const fn align_program_counter(&mut self, alignment: u32) {
        self.0[REG_PROGRAM_COUNTER] &= !(alignment - 1);
    }

    /// # Panics
    ///
    /// When `reg` is not a register index (0..=15).
    pub fn set_register_at(&mut self, reg: usize, new_value: u32) {
        assert!(reg <= 15, "Invalid register index: {reg} (0x{reg:X})");
        self.0[reg] = new_value;
    }

    #[must_use]
    pub const fn register_at(&self, reg: usize) -> u32 {
        self.0[reg]
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<u32> {
        self.0.as_slice().to_vec()
    }
}
