//! # ARM Instruction Set (32-bit)
//!
//! Every instruction carries a condition in its top nibble.
//!
//! ```text
//! 31-28   27-25   24-0
//! [Cond] [Class] [Instruction-specific]
//! ```
//!
//! | Bits 27-25 | Category                          | Examples     |
//! |------------|-----------------------------------|--------------|
//! | 001        | Data Processing, immediate        | MOV, SUB     |
//! | 010        | Single Data Transfer, immediate   | LDR, STRB    |
//! | 101        | Branch                            | B            |
//!
//! ## Submodules
//!
//! - [`instructions`] - Decoding (`TryFrom<u32>`) and disassembly
//! - [`mode`] - Raw opcode wrapper
//! - [`alu_instruction`] - ALU opcodes, immediates and the handler table
//! - [`operations`] - Execution

#[allow(clippy::cast_possible_truncation)]
pub mod alu_instruction;

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_possible_wrap)]
pub mod instructions;

pub mod mode;

#[allow(clippy::cast_possible_truncation)]
pub mod operations;
