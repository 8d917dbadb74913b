use serde::{Deserialize, Serialize};

use crate::error::EmuError;

/// Size of a single bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Width {
    Byte = 1,
    HalfWord = 2,
    Word = 4,
}

impl Width {
    /// Number of bytes moved by an access of this width.
    #[must_use]
    pub const fn size(self) -> u32 {
        self as u32
    }

    /// Keeps only the bits an access of this width can carry.
    #[must_use]
    pub const fn truncate(self, value: u32) -> u32 {
        match self {
            Self::Byte => value & 0xFF,
            Self::HalfWord => value & 0xFFFF,
            Self::Word => value,
        }
    }
}

impl std::fmt::Display for Width {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Byte => f.write_str("byte"),
            Self::HalfWord => f.write_str("half-word"),
            Self::Word => f.write_str("word"),
        }
    }
}

/// Something that claims a range of the address space and answers
/// width-typed reads and writes inside it.
///
/// `contains` must be checked before `read_at`/`write_at`. Implementations
/// still refuse an access they do not claim with [`EmuError::UnmappedAddress`]
/// rather than serving it.
pub trait IoDevice {
    /// Short label used in trace output.
    fn name(&self) -> &'static str;

    fn contains(&self, address: u32, width: Width) -> bool;

    fn read_at(&self, address: u32, width: Width) -> Result<u32, EmuError>;

    /// Only the low `width` bytes of `value` are stored.
    fn write_at(&mut self, address: u32, width: Width, value: u32) -> Result<(), EmuError>;
}
