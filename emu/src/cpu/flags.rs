//! Single-bit fields of the load/store encodings, decoded into enums so the
//! handlers read as what they do rather than as bit tests.

use serde::{Deserialize, Serialize};

/// B bit (22): size of a single data transfer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadWriteKind {
    /// A full 32-bit word.
    #[default]
    Word,

    /// The low byte, zero-extended on load.
    Byte,
}

impl From<bool> for ReadWriteKind {
    fn from(value: bool) -> Self {
        if value { Self::Byte } else { Self::Word }
    }
}

/// L bit (20).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStoreKind {
    Store,
    Load,
}

impl From<bool> for LoadStoreKind {
    fn from(b: bool) -> Self {
        if b { Self::Load } else { Self::Store }
    }
}

/// P bit (24).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Indexing {
    /// Add offset after transfer, the base is always written back.
    Post,

    /// Add offset before transfer.
    Pre,
}

impl From<bool> for Indexing {
    fn from(state: bool) -> Self {
        if state { Self::Pre } else { Self::Post }
    }
}

/// U bit (23).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Offsetting {
    /// Subtract the offset from base.
    Down,

    /// Add the offset to base.
    Up,
}

impl From<bool> for Offsetting {
    fn from(state: bool) -> Self {
        if state { Self::Up } else { Self::Down }
    }
}

impl Offsetting {
    #[must_use]
    pub const fn apply(self, base: u32, offset: u32) -> u32 {
        match self {
            Self::Down => base.wrapping_sub(offset),
            Self::Up => base.wrapping_add(offset),
        }
    }
}

/// I bit (25) of data processing: whether operand 2 is an immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperandKind {
    Immediate,
    Register,
}

impl From<bool> for OperandKind {
    fn from(b: bool) -> Self {
        if b { Self::Immediate } else { Self::Register }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsetting_wraps_both_ways() {
        assert_eq!(Offsetting::Up.apply(0xFFFF_FFFC, 8), 4);
        assert_eq!(Offsetting::Down.apply(4, 8), 0xFFFF_FFFC);
    }

    #[test]
    fn bits_map_to_variants() {
        assert_eq!(Indexing::from(true), Indexing::Pre);
        assert_eq!(Indexing::from(false), Indexing::Post);
        assert_eq!(ReadWriteKind::from(true), ReadWriteKind::Byte);
        assert_eq!(LoadStoreKind::from(false), LoadStoreKind::Store);
        assert_eq!(OperandKind::from(true), OperandKind::Immediate);
    }
}
