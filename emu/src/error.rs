use thiserror::Error;

use crate::bus::Width;
use crate::cpu::arm::alu_instruction::AluOpcode;

/// Fatal conditions raised while running the core.
///
/// None of them is recoverable: the core latches the first one it sees and the
/// driver decides how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmuError {
    /// No device on the bus claims the access.
    #[error("unmapped address 0x{address:08X} ({width} access)")]
    UnmappedAddress { address: u32, width: Width },

    /// The instruction word is outside the implemented subset or contradicts
    /// the class it was dispatched to.
    #[error("undefined instruction 0x{raw:08X} ({reason})")]
    UndefinedInstruction { raw: u32, reason: UndefinedReason },

    /// A program image does not fit inside the backing store.
    #[error("image of {len} bytes does not fit at 0x{address:08X}")]
    ImageOutOfBounds { address: u32, len: usize },

    /// Instructions are fetched from word boundaries only.
    #[error("entry point 0x{address:08X} is not word aligned")]
    MisalignedEntryPoint { address: u32 },
}

impl EmuError {
    pub(crate) const fn undefined(raw: u32, reason: UndefinedReason) -> Self {
        Self::UndefinedInstruction { raw, reason }
    }
}

/// Why an instruction word was rejected by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UndefinedReason {
    #[error("cond == 0xF")]
    ReservedCondition,

    #[error("Branch & Branch with Link and Change to Thumb")]
    BranchExchangeToThumb,

    #[error("Data Processing, misc, multiplies")]
    DataProcessingMiscMultiply,

    #[error("Load/Store register offset")]
    LoadStoreRegisterOffset,

    #[error("Load/Store Multiple")]
    LoadStoreMultiple,

    #[error("Coprocessor Load/Store and Double Register Transfers")]
    CoprocessorLoadStore,

    #[error("Software Interrupt and Coprocessor Instructions")]
    SoftwareInterruptCoprocessor,

    #[error("Data processing non-immediate")]
    DataProcessingNotImmediate,

    #[error("Data processing opcode not implemented: {0}")]
    DataProcessingOpcode(AluOpcode),

    #[error("Addressing mode 2 register")]
    AddressingModeRegister,

    #[error("Branch with Link")]
    BranchWithLink,
}
