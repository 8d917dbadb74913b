use std::io::Write;

use crate::bus::Bus;
use crate::config::SystemConfig;
use crate::cpu::arm_core::SIZE_OF_ARM_INSTRUCTION;
use crate::cpu::{ArmCore, StepOutcome};
use crate::error::EmuError;
use crate::memory::debug_out::DebugOut;
use crate::memory::ram::Ram;

/// RAM, the debug port and the core, wired up from a [`SystemConfig`].
///
/// RAM is registered first, so when the two overlap RAM wins.
pub struct Machine {
    cpu: ArmCore,
}

impl Machine {
    pub fn new(
        config: &SystemConfig,
        image: &[u8],
        debug_sink: Box<dyn Write + Send>,
    ) -> Result<Self, EmuError> {
        if config.entry_point % SIZE_OF_ARM_INSTRUCTION != 0 {
            return Err(EmuError::MisalignedEntryPoint {
                address: config.entry_point,
            });
        }

        let mut ram = Ram::new(config.ram_base, config.ram_size);
        ram.load_at(config.load_address, image)?;

        let debug_out = DebugOut::new(config.debug_out_address, debug_sink);
        let bus = Bus::new(vec![Box::new(ram), Box::new(debug_out)]);

        let mut cpu = ArmCore::new(bus, config.overflow_rule);
        cpu.state_mut()
            .registers
            .set_program_counter(config.entry_point);

        tracing::debug!(
            "machine ready: devices [{}], pc 0x{:08X}",
            cpu.bus().device_names().collect::<Vec<_>>().join(", "),
            config.entry_point
        );

        Ok(Self { cpu })
    }

    pub fn step(&mut self) -> Result<StepOutcome, EmuError> {
        self.cpu.step()
    }

    /// Runs `steps` instructions, stopping at the first fault.
    pub fn run(&mut self, steps: usize) -> Result<(), EmuError> {
        for _ in 0..steps {
            self.step()?;
        }

        Ok(())
    }

    #[must_use]
    pub const fn cpu(&self) -> &ArmCore {
        &self.cpu
    }
}
