//! # Data Processing (ALU)
//!
//! ```text
//! 31-28  27-26  25  24-21   20  19-16  15-12  11-8     7-0
//! [Cond] [ 00 ] [I] [Opcode] [S] [ Rn ] [ Rd ] [Rotate] [Imm8]
//! ```
//!
//! With I=1 the second operand is an 8-bit immediate rotated right by twice
//! the 4-bit rotate field, so every value of the form `imm8 ROR (2 * n)`
//! can be encoded:
//!
//! ```text
//! Rotate=0x8, Imm8=0x01  →  0x01 ROR 16  =  0x0001_0000
//! Rotate=0x4, Imm8=0x01  →  0x01 ROR 8   =  0x0100_0000
//! Rotate=0x0, Imm8=0xFF  →  0xFF ROR 0   =  0x0000_00FF
//! ```
//!
//! Opcodes are mapped to handlers through an [`AluTable`]. The default table
//! only knows `SUB` and `MOV`; any other opcode reaching the core is an
//! undefined instruction until a handler is installed for it.

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;
use crate::cpu::ProcessorState;

/// The 16 data processing opcodes (bits 24-21).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AluOpcode {
    And = 0x0,
    Eor = 0x1,
    Sub = 0x2,
    Rsb = 0x3,
    Add = 0x4,
    Adc = 0x5,
    Sbc = 0x6,
    Rsc = 0x7,
    Tst = 0x8,
    Teq = 0x9,
    Cmp = 0xA,
    Cmn = 0xB,
    Orr = 0xC,
    Mov = 0xD,
    Bic = 0xE,
    Mvn = 0xF,
}

impl AluOpcode {
    /// Test opcodes only update flags and have no destination.
    #[must_use]
    pub const fn is_test(self) -> bool {
        matches!(self, Self::Tst | Self::Teq | Self::Cmp | Self::Cmn)
    }

    /// Move opcodes ignore Rn.
    #[must_use]
    pub const fn is_move(self) -> bool {
        matches!(self, Self::Mov | Self::Mvn)
    }
}

impl From<u32> for AluOpcode {
    /// Only the low nibble is looked at.
    fn from(alu_op_code: u32) -> Self {
        match alu_op_code & 0xF {
            0x0 => Self::And,
            0x1 => Self::Eor,
            0x2 => Self::Sub,
            0x3 => Self::Rsb,
            0x4 => Self::Add,
            0x5 => Self::Adc,
            0x6 => Self::Sbc,
            0x7 => Self::Rsc,
            0x8 => Self::Tst,
            0x9 => Self::Teq,
            0xA => Self::Cmp,
            0xB => Self::Cmn,
            0xC => Self::Orr,
            0xD => Self::Mov,
            0xE => Self::Bic,
            _ => Self::Mvn,
        }
    }
}

impl std::fmt::Display for AluOpcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Eor => f.write_str("EOR"),
            Self::Sub => f.write_str("SUB"),
            Self::Rsb => f.write_str("RSB"),
            Self::Add => f.write_str("ADD"),
            Self::Adc => f.write_str("ADC"),
            Self::Sbc => f.write_str("SBC"),
            Self::Rsc => f.write_str("RSC"),
            Self::Tst => f.write_str("TST"),
            Self::Teq => f.write_str("TEQ"),
            Self::Cmp => f.write_str("CMP"),
            Self::Cmn => f.write_str("CMN"),
            Self::Orr => f.write_str("ORR"),
            Self::Mov => f.write_str("MOV"),
            Self::Bic => f.write_str("BIC"),
            Self::Mvn => f.write_str("MVN"),
        }
    }
}

/// Expands the 12-bit immediate shifter operand (`rotate:imm8`).
#[must_use]
pub fn rotated_immediate(shifter_operand: u32) -> u32 {
    let rotate = shifter_operand.get_bits(8..=11) * 2;
    let immediate = shifter_operand.get_bits(0..=7);
    immediate.rotate_right(rotate)
}

/// Outcome of an arithmetic operation together with the flags it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArithmeticOpResult {
    pub result: u32,
    pub carry: bool,
    pub overflow: bool,
    pub sign: bool,
    pub zero: bool,
}

/// How `SUB` computes V.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowRule {
    /// `(a ^ b) & ((a ^ result) >> 31)`, bit 0. Only the sign of
    /// `a ^ result` takes part, masked against bit 0 of `a ^ b`. This is the
    /// computation existing program traces were recorded with.
    #[default]
    Literal,

    /// `((a ^ b) & (a ^ result)) >> 31`: operands of different sign and a
    /// result whose sign differs from the minuend.
    Architectural,
}

impl OverflowRule {
    #[must_use]
    pub const fn sub_overflow(self, minuend: u32, subtrahend: u32, result: u32) -> bool {
        let operands_differ = minuend ^ subtrahend;
        let result_differs = minuend ^ result;
        match self {
            Self::Literal => (operands_differ & (result_differs >> 31)) & 1 == 1,
            Self::Architectural => (operands_differ & result_differs) >> 31 == 1,
        }
    }
}

/// `first_op - second_op`. C is set when no borrow happened.
#[must_use]
pub fn sub_inner_op(first_op: u32, second_op: u32, rule: OverflowRule) -> ArithmeticOpResult {
    let result = first_op.wrapping_sub(second_op);

    ArithmeticOpResult {
        result,
        carry: first_op >= second_op,
        overflow: rule.sub_overflow(first_op, second_op, result),
        sign: result.get_bit(31),
        zero: result == 0,
    }
}

/// Decoded operands handed to an ALU handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataProcessingOperands {
    pub set_flags: bool,
    pub rn: usize,
    pub rd: usize,
    /// Second operand, already expanded from the shifter operand.
    pub operand2: u32,
}

/// Executes one data processing opcode against the processor state.
pub type AluHandler = fn(&mut ProcessorState, &DataProcessingOperands);

/// Opcode → handler mapping consulted by the core before executing a data
/// processing instruction.
#[derive(Clone, Copy)]
pub struct AluTable([Option<AluHandler>; 16]);

impl AluTable {
    /// A table with no handler at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self([None; 16])
    }

    /// The handlers implemented by this core: `SUB` (with the given overflow
    /// rule) and `MOV`.
    #[must_use]
    pub fn new(rule: OverflowRule) -> Self {
        use crate::cpu::arm::operations;

        let mut table = Self::empty();
        table.set(
            AluOpcode::Sub,
            match rule {
                OverflowRule::Literal => operations::sub_literal_overflow,
                OverflowRule::Architectural => operations::sub_architectural_overflow,
            },
        );
        table.set(AluOpcode::Mov, operations::mov);
        table
    }

    pub const fn set(&mut self, opcode: AluOpcode, handler: AluHandler) {
        self.0[opcode as usize] = Some(handler);
    }

    #[must_use]
    pub const fn get(&self, opcode: AluOpcode) -> Option<AluHandler> {
        self.0[opcode as usize]
    }
}

impl Default for AluTable {
    fn default() -> Self {
        Self::new(OverflowRule::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rotate_zero_keeps_the_immediate() {
        assert_eq!(rotated_immediate(0x0FF), 0xFF);
        assert_eq!(rotated_immediate(0x001), 0x01);
    }

    #[test]
    fn rotate_is_twice_the_field() {
        // amount 4 rotates by 8 bits.
        assert_eq!(rotated_immediate(0x401), 0x0100_0000);
        assert_eq!(rotated_immediate(0x4FF), 0xFF00_0000);
        assert_eq!(rotated_immediate(0x801), 0x0001_0000);
        assert_eq!(rotated_immediate(0x1FF), 0xC000_003F);
        assert_eq!(rotated_immediate(0xF01), 0x0000_0004);
    }

    #[test]
    fn opcode_round_trip_through_bits() {
        for bits in 0..16_u32 {
            assert_eq!(AluOpcode::from(bits) as u32, bits);
        }
        assert_eq!(AluOpcode::from(0b1101), AluOpcode::Mov);
        assert_eq!(AluOpcode::from(0b0010), AluOpcode::Sub);
        assert!(AluOpcode::Cmp.is_test());
        assert!(AluOpcode::Mvn.is_move());
        assert!(!AluOpcode::Sub.is_test());
    }

    #[test]
    fn sub_zero_minus_one_borrows() {
        // The literal rule reports V here although no signed overflow happened:
        // bit 0 of (a ^ b) is set and (a ^ result) has bit 31 set.
        let r = sub_inner_op(0, 1, OverflowRule::Literal);
        assert_eq!(
            r,
            ArithmeticOpResult {
                result: 0xFFFF_FFFF,
                carry: false,
                overflow: true,
                sign: true,
                zero: false,
            }
        );

        let r = sub_inner_op(0, 1, OverflowRule::Architectural);
        assert_eq!(r.result, 0xFFFF_FFFF);
        assert!(!r.overflow);
    }

    #[test]
    fn sub_equal_operands_sets_zero_and_carry() {
        let r = sub_inner_op(5, 5, OverflowRule::Literal);
        assert_eq!(r.result, 0);
        assert!(r.zero);
        assert!(r.carry);
        assert!(!r.sign);
    }

    #[test]
    fn overflow_rules_agree_when_bit_zero_of_operands_differ() {
        // 0x8000_0000 - 1 overflows, and bit 0 of (a ^ b) happens to be set.
        let a = 0x8000_0000;
        assert!(sub_inner_op(a, 1, OverflowRule::Literal).overflow);
        assert!(sub_inner_op(a, 1, OverflowRule::Architectural).overflow);
    }

    #[test]
    fn literal_overflow_is_narrower() {
        // 0x8000_0000 - 2 overflows but bit 0 of (a ^ b) is clear.
        let a = 0x8000_0000;
        assert!(!sub_inner_op(a, 2, OverflowRule::Literal).overflow);
        assert!(sub_inner_op(a, 2, OverflowRule::Architectural).overflow);

        // It also reports overflows that did not happen: 1 - 2 only crosses
        // zero, yet bit 0 of (a ^ b) and bit 31 of (a ^ result) are both set.
        let r = sub_inner_op(1, 2, OverflowRule::Literal);
        assert_eq!(r.result, 0xFFFF_FFFF);
        assert!(r.overflow);
        assert!(!sub_inner_op(1, 2, OverflowRule::Architectural).overflow);

        // When the sign of the minuend is kept, neither rule fires.
        assert!(!sub_inner_op(0x8000_0003, 1, OverflowRule::Literal).overflow);
        assert!(!sub_inner_op(0x8000_0003, 1, OverflowRule::Architectural).overflow);
    }

    #[test]
    fn default_table_knows_only_sub_and_mov() {
        let table = AluTable::default();
        for bits in 0..16_u32 {
            let opcode = AluOpcode::from(bits);
            let expected = matches!(opcode, AluOpcode::Sub | AluOpcode::Mov);
            assert_eq!(table.get(opcode).is_some(), expected, "{opcode}");
        }
        assert!(AluTable::empty().get(AluOpcode::Mov).is_none());
    }
}
