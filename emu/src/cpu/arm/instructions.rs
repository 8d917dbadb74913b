//! # ARM Instruction Decoding
//!
//! Turns a 32-bit ARM word into an [`ArmModeInstruction`], or explains why it
//! can't.
//!
//! ## Instruction Categories
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Bits 27-25 select the class:                                           │
//! │                                                                         │
//! │  000  →  Data Processing (register) / misc / multiply     undefined     │
//! │  001  →  Data Processing (immediate operand)              decoded       │
//! │  010  →  Load/Store (immediate offset)                    decoded       │
//! │  011  →  Load/Store (register offset)                     undefined     │
//! │  100  →  Block Data Transfer (LDM/STM)                    undefined     │
//! │  101  →  Branch (B/BL)                                    decoded       │
//! │  110  →  Coprocessor Data Transfer                        undefined     │
//! │  111  →  Software Interrupt / Coprocessor ops             undefined     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Words whose condition field is `1111` live in the unconditional extension
//! space and are rejected before the class is even looked at.
//!
//! The decoder only checks the encoding. Whether a decoded instruction can
//! run (an ALU opcode without handler, `BL`) is up to the core, so adding a
//! handler never means touching this file.

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;
use crate::cpu::arm::alu_instruction::{AluOpcode, rotated_immediate};
use crate::cpu::condition::Condition;
use crate::cpu::flags::{Indexing, LoadStoreKind, Offsetting, OperandKind, ReadWriteKind};
use crate::error::{EmuError, UndefinedReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmModeInstruction {
    DataProcessing {
        condition: Condition,
        alu_instruction: AluOpcode,
        set_conditions: bool,
        op_kind: OperandKind,
        rn: u32,
        destination: u32,
        /// Raw 12-bit shifter operand (`rotate:imm8`).
        op2: u32,
    },
    SingleDataTransfer {
        condition: Condition,
        kind: LoadStoreKind,
        quantity: ReadWriteKind,
        write_back: bool,
        indexing: Indexing,
        rd: u32,
        base_register: u32,
        /// Unsigned 12-bit immediate offset.
        offset: u32,
        offsetting: Offsetting,
    },
    Branch {
        condition: Condition,
        link: bool,
        /// Byte offset, already shifted and sign-extended.
        offset: u32,
    },
}

/// Refuses the `cond == 1111` space. Bits 27-24 equal to `1010` get the
/// `BLX <imm>` reason, with H (bit 24) clear.
pub fn reject_unconditional(op_code: u32) -> Result<(), EmuError> {
    if op_code.get_bits(28..=31) != 0b1111 {
        return Ok(());
    }

    let reason = if op_code.get_bits(24..=27) == 0b1010 {
        UndefinedReason::BranchExchangeToThumb
    } else {
        UndefinedReason::ReservedCondition
    };

    Err(EmuError::undefined(op_code, reason))
}

impl TryFrom<u32> for ArmModeInstruction {
    type Error = EmuError;

    fn try_from(op_code: u32) -> Result<Self, Self::Error> {
        reject_unconditional(op_code)?;

        match op_code.get_bits(25..=27) {
            0b000 => Err(EmuError::undefined(
                op_code,
                UndefinedReason::DataProcessingMiscMultiply,
            )),
            0b001 => decode_data_processing(op_code),
            0b010 => decode_single_data_transfer(op_code),
            0b011 => Err(EmuError::undefined(
                op_code,
                UndefinedReason::LoadStoreRegisterOffset,
            )),
            0b100 => Err(EmuError::undefined(
                op_code,
                UndefinedReason::LoadStoreMultiple,
            )),
            0b101 => Ok(decode_branch(op_code)),
            0b110 => Err(EmuError::undefined(
                op_code,
                UndefinedReason::CoprocessorLoadStore,
            )),
            _ => Err(EmuError::undefined(
                op_code,
                UndefinedReason::SoftwareInterruptCoprocessor,
            )),
        }
    }
}

fn decode_data_processing(op_code: u32) -> Result<ArmModeInstruction, EmuError> {
    let op_kind = OperandKind::from(op_code.get_bit(25));
    if op_kind != OperandKind::Immediate {
        return Err(EmuError::undefined(
            op_code,
            UndefinedReason::DataProcessingNotImmediate,
        ));
    }

    Ok(ArmModeInstruction::DataProcessing {
        condition: Condition::of_instruction(op_code),
        alu_instruction: AluOpcode::from(op_code.get_bits(21..=24)),
        set_conditions: op_code.get_bit(20),
        op_kind,
        rn: op_code.get_bits(16..=19),
        destination: op_code.get_bits(12..=15),
        op2: op_code.get_bits(0..=11),
    })
}

fn decode_single_data_transfer(op_code: u32) -> Result<ArmModeInstruction, EmuError> {
    // For addressing mode 2 the I bit selects the *register* form.
    if op_code.get_bit(25) {
        return Err(EmuError::undefined(
            op_code,
            UndefinedReason::AddressingModeRegister,
        ));
    }

    Ok(ArmModeInstruction::SingleDataTransfer {
        condition: Condition::of_instruction(op_code),
        kind: LoadStoreKind::from(op_code.get_bit(20)),
        quantity: ReadWriteKind::from(op_code.get_bit(22)),
        write_back: op_code.get_bit(21),
        indexing: Indexing::from(op_code.get_bit(24)),
        rd: op_code.get_bits(12..=15),
        base_register: op_code.get_bits(16..=19),
        offset: op_code.get_bits(0..=11),
        offsetting: Offsetting::from(op_code.get_bit(23)),
    })
}

fn decode_branch(op_code: u32) -> ArmModeInstruction {
    ArmModeInstruction::Branch {
        condition: Condition::of_instruction(op_code),
        link: op_code.get_bit(24),
        offset: op_code.get_bits(0..=23).sign_extended(24) << 2,
    }
}

impl ArmModeInstruction {
    #[must_use]
    pub const fn condition(&self) -> Condition {
        match self {
            Self::DataProcessing { condition, .. }
            | Self::SingleDataTransfer { condition, .. }
            | Self::Branch { condition, .. } => *condition,
        }
    }

    /// Assembler syntax, e.g. `MOVS R0, #0x10000` or `STRB R1, [R0, #0x4]!`.
    #[must_use]
    pub fn disassembler(&self) -> String {
        match *self {
            Self::DataProcessing {
                condition,
                alu_instruction,
                set_conditions,
                rn,
                destination,
                op2,
                ..
            } => {
                let immediate = rotated_immediate(op2);
                let s = if set_conditions && !alu_instruction.is_test() {
                    "S"
                } else {
                    ""
                };

                if alu_instruction.is_move() {
                    format!("{alu_instruction}{s}{condition} R{destination}, #0x{immediate:X}")
                } else if alu_instruction.is_test() {
                    format!("{alu_instruction}{condition} R{rn}, #0x{immediate:X}")
                } else {
                    format!(
                        "{alu_instruction}{s}{condition} R{destination}, R{rn}, #0x{immediate:X}"
                    )
                }
            }
            Self::SingleDataTransfer {
                condition,
                kind,
                quantity,
                write_back,
                indexing,
                rd,
                base_register,
                offset,
                offsetting,
            } => {
                let mnemonic = match kind {
                    LoadStoreKind::Load => "LDR",
                    LoadStoreKind::Store => "STR",
                };
                let b = match quantity {
                    ReadWriteKind::Byte => "B",
                    ReadWriteKind::Word => "",
                };
                let sign = match offsetting {
                    Offsetting::Up => "",
                    Offsetting::Down => "-",
                };
                let address = match indexing {
                    Indexing::Pre if offset == 0 && !write_back => format!("[R{base_register}]"),
                    Indexing::Pre => {
                        let bang = if write_back { "!" } else { "" };
                        format!("[R{base_register}, #{sign}0x{offset:X}]{bang}")
                    }
                    Indexing::Post => format!("[R{base_register}], #{sign}0x{offset:X}"),
                };

                format!("{mnemonic}{b}{condition} R{rd}, {address}")
            }
            Self::Branch {
                condition,
                link,
                offset,
            } => {
                let l = if link { "L" } else { "" };
                format!("B{l}{condition} #{}", offset as i32)
            }
        }
    }
}

impl std::fmt::Display for ArmModeInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.disassembler())
    }
}
