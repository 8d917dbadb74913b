use crate::bus::Width;
use crate::cpu::ProcessorState;
use crate::cpu::arm::alu_instruction::{
    AluHandler, DataProcessingOperands, OverflowRule, rotated_immediate, sub_inner_op,
};
use crate::cpu::arm_core::{ArmCore, SIZE_OF_ARM_INSTRUCTION};
use crate::cpu::flags::{Indexing, LoadStoreKind, Offsetting, ReadWriteKind};
use crate::cpu::registers::REG_PROGRAM_COUNTER;
use crate::error::EmuError;

impl From<ReadWriteKind> for Width {
    fn from(quantity: ReadWriteKind) -> Self {
        match quantity {
            ReadWriteKind::Word => Self::Word,
            ReadWriteKind::Byte => Self::Byte,
        }
    }
}

impl ArmCore {
    /// Runs an already resolved ALU handler on the decoded fields.
    pub(crate) fn data_processing(
        &mut self,
        handler: AluHandler,
        operands: &DataProcessingOperands,
    ) {
        handler(&mut self.state, operands);
    }

    /// Builds the operands of a data processing immediate instruction.
    pub(crate) fn data_processing_operands(
        set_conditions: bool,
        rn: u32,
        destination: u32,
        op2: u32,
    ) -> DataProcessingOperands {
        DataProcessingOperands {
            set_flags: set_conditions,
            rn: rn as usize,
            rd: destination as usize,
            operand2: rotated_immediate(op2),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn single_data_transfer(
        &mut self,
        kind: LoadStoreKind,
        quantity: ReadWriteKind,
        write_back: bool,
        indexing: Indexing,
        rd: u32,
        base_register: u32,
        offset: u32,
        offsetting: Offsetting,
    ) -> Result<(), EmuError> {
        let base_register = base_register as usize;
        let rd = rd as usize;
        let base = self.state.registers.register_at(base_register);

        let mut address = match indexing {
            Indexing::Pre => offsetting.apply(base, offset),
            Indexing::Post => base,
        };

        // PC already points past this instruction, one more word reaches the
        // address of the instruction + 8.
        if base_register == REG_PROGRAM_COUNTER {
            address = address.wrapping_add(SIZE_OF_ARM_INSTRUCTION);
        }

        let width = Width::from(quantity);
        match kind {
            LoadStoreKind::Load => {
                let value = self.bus.read(address, width)?;
                self.state.registers.set_register_at(rd, value);
            }
            LoadStoreKind::Store => {
                let value = self.state.registers.register_at(rd);
                self.bus.write(address, width, value)?;
            }
        }

        match indexing {
            // write back is always true when using post indexing
            Indexing::Post => {
                let offset_address = offsetting.apply(address, offset);
                self.state
                    .registers
                    .set_register_at(base_register, offset_address);
            }
            Indexing::Pre => {
                if write_back {
                    self.state.registers.set_register_at(base_register, address);
                }
            }
        }

        Ok(())
    }

    /// `offset` is the sign-extended byte offset. PC has been advanced once
    /// already, the extra word lands on the architectural PC + 8 base.
    pub(crate) fn branch(&mut self, offset: u32) {
        let pc = self.state.registers.program_counter();
        self.state.registers.set_program_counter(
            pc.wrapping_add(offset)
                .wrapping_add(SIZE_OF_ARM_INSTRUCTION),
        );
    }
}

/// `Rd = Rd - op2`. The minuend is the destination register itself.
fn sub(state: &mut ProcessorState, operands: &DataProcessingOperands, rule: OverflowRule) {
    let minuend = state.registers.register_at(operands.rd);
    let sub_result = sub_inner_op(minuend, operands.operand2, rule);

    state.registers.set_register_at(operands.rd, sub_result.result);

    if operands.set_flags {
        state.cpsr.set_flags(&sub_result);
    }
}

pub fn sub_literal_overflow(state: &mut ProcessorState, operands: &DataProcessingOperands) {
    sub(state, operands, OverflowRule::Literal);
}

pub fn sub_architectural_overflow(state: &mut ProcessorState, operands: &DataProcessingOperands) {
    sub(state, operands, OverflowRule::Architectural);
}

/// `Rd = op2`. Only N and Z are touched.
pub fn mov(state: &mut ProcessorState, operands: &DataProcessingOperands) {
    state
        .registers
        .set_register_at(operands.rd, operands.operand2);

    if operands.set_flags {
        state.cpsr.set_sign_and_zero(operands.operand2);
    }
}
