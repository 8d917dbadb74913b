use emu::bus::Width;
use emu::config::SystemConfig;
use emu::cpu::arm::alu_instruction::AluOpcode;
use emu::cpu::StepOutcome;
use emu::error::{EmuError, UndefinedReason};
use emu::machine::Machine;
use emu::memory::debug_out::SharedBuffer;
use pretty_assertions::assert_eq;

fn assemble(program: &[u32]) -> Vec<u8> {
    program.iter().flat_map(|word| word.to_le_bytes()).collect()
}

fn machine(program: &[u32]) -> (Machine, SharedBuffer) {
    let out = SharedBuffer::default();
    let machine = Machine::new(
        &SystemConfig::default(),
        &assemble(program),
        Box::new(out.clone()),
    )
    .unwrap();
    (machine, out)
}

#[test]
fn hello_through_the_debug_port() {
    let (mut machine, out) = machine(&[
        0xE3A0_0801, // MOV R0, #0x10000
        0xE3A0_1048, // MOV R1, #'H'
        0xE5C0_1000, // STRB R1, [R0]
        0xE3A0_1069, // MOV R1, #'i'
        0xE5C0_1000, // STRB R1, [R0]
        0xEAFF_FFFE, // B .
    ]);

    assert_eq!(machine.run(100), Ok(()));
    assert_eq!(out.contents(), b"Hi");
    assert_eq!(machine.cpu().state().registers.program_counter(), 0x14);
    assert!(!machine.cpu().is_halted());
}

#[test]
fn countdown_loop_with_conditional_branch() {
    // R1 counts down from 3, each pass stores R1 at R0 and moves R0 on.
    let (mut machine, _) = machine(&[
        0xE3A0_0C01, // 0x00: MOV R0, #0x100
        0xE3A0_1003, // 0x04: MOV R1, #3
        0xE4C0_1001, // 0x08: STRB R1, [R0], #1
        0xE251_1001, // 0x0C: SUBS R1, R1, #1
        0x1AFF_FFFC, // 0x10: BNE 0x08
        0xEAFF_FFFE, // 0x14: B .
    ]);

    let mut skipped = 0;
    for _ in 0..13 {
        if machine.step().unwrap() == StepOutcome::Skipped {
            skipped += 1;
        }
    }

    let cpu = machine.cpu();
    assert_eq!(skipped, 1);
    assert_eq!(cpu.state().registers.register_at(0), 0x103);
    assert_eq!(cpu.state().registers.register_at(1), 0);
    assert!(cpu.state().cpsr.zero_flag());
    assert!(cpu.state().cpsr.carry_flag());
    assert_eq!(cpu.bus().read_word(0x100), Ok(0x0001_0203));
    assert_eq!(cpu.state().registers.program_counter(), 0x14);
}

#[test]
fn running_off_the_end_of_ram_is_unmapped() {
    let config = SystemConfig {
        ram_size: 8,
        debug_out_address: 0x100,
        ..SystemConfig::default()
    };
    let image = assemble(&[0xE3A0_0001, 0xE3A0_1002]);
    let mut machine = Machine::new(&config, &image, Box::new(std::io::sink())).unwrap();

    assert_eq!(
        machine.run(3),
        Err(EmuError::UnmappedAddress {
            address: 8,
            width: Width::Word,
        })
    );
    assert_eq!(machine.cpu().state().registers.register_at(1), 2);
}

#[test]
fn halt_reports_the_offending_word() {
    let (mut machine, out) = machine(&[
        0xE3A0_0801, // MOV R0, #0x10000
        0xE3A0_1041, // MOV R1, #'A'
        0xE280_1001, // ADD R1, R0, #1
        0xE5C0_1000, // STRB R1, [R0]
    ]);

    let err = machine.run(4).unwrap_err();
    assert_eq!(
        err,
        EmuError::UndefinedInstruction {
            raw: 0xE280_1001,
            reason: UndefinedReason::DataProcessingOpcode(AluOpcode::Add),
        }
    );
    assert_eq!(machine.cpu().fault(), Some(err));
    assert_eq!(machine.cpu().state().registers.register_at(1), 0x41);
    assert_eq!(machine.cpu().state().registers.program_counter(), 8);
    assert!(out.contents().is_empty());
}

#[test]
fn dump_is_serializable() {
    let (mut machine, _) = machine(&[0xE3B0_0000]); // MOVS R0, #0
    machine.step().unwrap();

    let json = serde_json::to_value(machine.cpu().state()).unwrap();
    assert_eq!(json["registers"][15], 4);
    assert_eq!(json["cpsr"]["zero"], true);
}
