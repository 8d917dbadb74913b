pub mod arm;

#[allow(clippy::module_name_repetitions)]
pub mod arm_core;

#[allow(clippy::cast_possible_truncation)]
pub mod condition;
pub mod flags;

#[allow(clippy::cast_possible_truncation)]
pub mod psr;
pub mod registers;

pub use arm_core::{ArmCore, ProcessorState, StepOutcome};
