//! # Fetch / Decode / Execute
//!
//! ```text
//!          ┌──────────┐   fault   ┌────────┐
//!   step → │  fetch   │ ────────► │ halted │ ◄─── every later step
//!          └────┬─────┘           └────────┘
//!               ▼                      ▲
//!          cond == 1111? ──── yes ─────┤
//!               ▼                      │
//!          condition holds? ── no ──► PC += 4, Skipped
//!               ▼ yes                  │
//!          decode + resolve ── err ────┤   (nothing touched yet)
//!               ▼                      │
//!          PC += 4, execute ── err ────┘
//!               ▼
//!          align PC, Executed
//! ```
//!
//! While an instruction runs, R15 already points at the next one. Handlers
//! that need the architectural "PC + 8" add one more word themselves.

use serde::{Deserialize, Serialize};

use crate::bus::Bus;
use crate::cpu::arm::alu_instruction::{AluHandler, AluOpcode, AluTable, OverflowRule};
use crate::cpu::arm::instructions::{ArmModeInstruction, reject_unconditional};
use crate::cpu::arm::mode::ArmModeOpcode;
use crate::cpu::condition::Condition;
use crate::cpu::psr::Psr;
use crate::cpu::registers::Registers;
use crate::error::{EmuError, UndefinedReason};

pub const SIZE_OF_ARM_INSTRUCTION: u32 = 4;

/// Registers plus status word. This is everything a step can change besides
/// memory.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorState {
    pub registers: Registers,
    pub cpsr: Psr,
}

impl std::fmt::Display for ProcessorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, value) in self.registers.to_vec().iter().enumerate() {
            write!(f, "R{idx}: {value:x} ")?;
        }

        let cpsr = self.cpsr;
        write!(
            f,
            "CPSR: N={} Z={} C={} V={} I={} F={} T={} Mode={}",
            u8::from(cpsr.sign_flag()),
            u8::from(cpsr.zero_flag()),
            u8::from(cpsr.carry_flag()),
            u8::from(cpsr.overflow_flag()),
            u8::from(cpsr.irq_disable()),
            u8::from(cpsr.fiq_disable()),
            u8::from(cpsr.state_bit()),
            cpsr.mode(),
        )
    }
}

/// What a successful step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    Executed,

    /// The condition field did not hold. Only PC moved.
    Skipped,
}

pub struct ArmCore {
    pub(crate) state: ProcessorState,
    pub(crate) bus: Bus,
    alu_table: AluTable,
    fault: Option<EmuError>,
}

impl ArmCore {
    #[must_use]
    pub fn new(bus: Bus, overflow_rule: OverflowRule) -> Self {
        Self {
            state: ProcessorState::default(),
            bus,
            alu_table: AluTable::new(overflow_rule),
            fault: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ProcessorState {
        &self.state
    }

    pub const fn state_mut(&mut self) -> &mut ProcessorState {
        &mut self.state
    }

    #[must_use]
    pub const fn bus(&self) -> &Bus {
        &self.bus
    }

    pub const fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Installs (or replaces) the handler run for `opcode`.
    pub const fn set_alu_handler(&mut self, opcode: AluOpcode, handler: AluHandler) {
        self.alu_table.set(opcode, handler);
    }

    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.fault.is_some()
    }

    /// The fault that halted the core, if any.
    #[must_use]
    pub const fn fault(&self) -> Option<EmuError> {
        self.fault
    }

    pub fn fetch_arm(&self) -> Result<u32, EmuError> {
        self.bus.read_word(self.state.registers.program_counter())
    }

    /// Runs one instruction. After the first error the core stays halted and
    /// keeps returning it.
    pub fn step(&mut self) -> Result<StepOutcome, EmuError> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }

        self.try_step().inspect_err(|fault| {
            tracing::debug!(
                "halted at 0x{:08X}: {fault}",
                self.state.registers.program_counter()
            );
            self.fault = Some(*fault);
        })
    }

    fn try_step(&mut self) -> Result<StepOutcome, EmuError> {
        let pc = self.state.registers.program_counter();
        let raw = self.fetch_arm()?;

        reject_unconditional(raw)?;

        let condition = Condition::of_instruction(raw);
        if !self.state.cpsr.can_execute(condition) {
            tracing::trace!("0x{pc:08X}: 0x{raw:08X} skipped ({condition:?})");
            self.state
                .registers
                .advance_program_counter(SIZE_OF_ARM_INSTRUCTION);
            return Ok(StepOutcome::Skipped);
        }

        let op_code = self.decode(raw)?;
        let alu_handler = self.resolve(&op_code)?;
        tracing::trace!("0x{pc:08X}: {}", op_code.instruction);

        self.state
            .registers
            .advance_program_counter(SIZE_OF_ARM_INSTRUCTION);
        self.execute_arm(op_code, alu_handler)?;
        self.state
            .registers
            .align_program_counter(SIZE_OF_ARM_INSTRUCTION);

        Ok(StepOutcome::Executed)
    }

    pub fn decode(&self, raw: u32) -> Result<ArmModeOpcode, EmuError> {
        let op_code = ArmModeOpcode::try_from(raw)?;
        tracing::trace!("\n{op_code}");
        Ok(op_code)
    }

    /// Checks that a decoded instruction can run on this core, without
    /// changing anything. Data processing gets its handler back.
    fn resolve(&self, op_code: &ArmModeOpcode) -> Result<Option<AluHandler>, EmuError> {
        match op_code.instruction {
            ArmModeInstruction::DataProcessing {
                alu_instruction, ..
            } => self.alu_table.get(alu_instruction).map(Some).ok_or_else(|| {
                EmuError::undefined(
                    op_code.raw,
                    UndefinedReason::DataProcessingOpcode(alu_instruction),
                )
            }),
            ArmModeInstruction::Branch { link: true, .. } => Err(EmuError::undefined(
                op_code.raw,
                UndefinedReason::BranchWithLink,
            )),
            ArmModeInstruction::SingleDataTransfer { .. } | ArmModeInstruction::Branch { .. } => {
                Ok(None)
            }
        }
    }

    fn execute_arm(
        &mut self,
        op_code: ArmModeOpcode,
        alu_handler: Option<AluHandler>,
    ) -> Result<(), EmuError> {
        use ArmModeInstruction::{Branch, DataProcessing, SingleDataTransfer};

        match op_code.instruction {
            DataProcessing {
                alu_instruction,
                set_conditions,
                rn,
                destination,
                op2,
                ..
            } => {
                let handler = alu_handler.ok_or_else(|| {
                    EmuError::undefined(
                        op_code.raw,
                        UndefinedReason::DataProcessingOpcode(alu_instruction),
                    )
                })?;
                let operands =
                    Self::data_processing_operands(set_conditions, rn, destination, op2);
                self.data_processing(handler, &operands);
                Ok(())
            }
            SingleDataTransfer {
                kind,
                quantity,
                write_back,
                indexing,
                rd,
                base_register,
                offset,
                offsetting,
                ..
            } => self.single_data_transfer(
                kind,
                quantity,
                write_back,
                indexing,
                rd,
                base_register,
                offset,
                offsetting,
            ),
            Branch { offset, .. } => {
                self.branch(offset);
                Ok(())
            }
        }
    }
}
