use crate::cpu::arm::instructions::ArmModeInstruction;
use crate::cpu::condition::Condition;
use crate::error::EmuError;

/// A decoded ARM word that still remembers its raw encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmModeOpcode {
    pub instruction: ArmModeInstruction,
    pub condition: Condition,
    pub raw: u32,
}

impl TryFrom<u32> for ArmModeOpcode {
    type Error = EmuError;

    fn try_from(op_code: u32) -> Result<Self, Self::Error> {
        let instruction = ArmModeInstruction::try_from(op_code)?;

        Ok(Self {
            condition: instruction.condition(),
            instruction,
            raw: op_code,
        })
    }
}

impl std::ops::Deref for ArmModeOpcode {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

impl std::fmt::Display for ArmModeOpcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let instruction = format!("INS: {}\n", self.instruction);

        let bytes_pos1 = "POS: |..3 ..................2 ..................1 ..................0|\n";
        let bytes_pos2 = "     |1_0_9_8_7_6_5_4_3_2_1_0_9_8_7_6_5_4_3_2_1_0_9_8_7_6_5_4_3_2_1_0|\n";

        let op_code_format = match self.instruction {
            ArmModeInstruction::DataProcessing { .. } => {
                "FMT: |_Cond__|0_0|I|_code__|S|__Rn___|__Rd___|_Rotate|_____Imm8______|"
            }
            ArmModeInstruction::SingleDataTransfer { .. } => {
                "FMT: |_Cond__|0_1|I|P|U|B|W|L|__Rn___|__Rd___|________Offset_________|"
            }
            ArmModeInstruction::Branch { .. } => {
                "FMT: |_Cond__|1_0_1|L|______________________Offset___________________|"
            }
        };

        let raw_bits = format!("{:032b}", self.raw)
            .chars()
            .map(String::from)
            .collect::<Vec<_>>()
            .join("_");
        let raw_bits = format!("RAW: |{raw_bits}|\n");

        write!(
            f,
            "{instruction}{bytes_pos1}{bytes_pos2}{raw_bits}{op_code_format}"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_raw_word_and_condition() {
        let op_code = ArmModeOpcode::try_from(0x0A00_0010).unwrap();
        assert_eq!(*op_code, 0x0A00_0010);
        assert_eq!(op_code.condition, Condition::EQ);
    }

    #[test]
    fn layout_lines_up_with_the_raw_bits() {
        let op_code = ArmModeOpcode::try_from(0xE3A0_1048).unwrap();
        let rendered = op_code.to_string();
        let lines = rendered.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "INS: MOV R1, #0x48");
        assert_eq!(
            lines[3],
            "RAW: |1_1_1_0_0_0_1_1_1_0_1_0_0_0_0_0_0_0_0_1_0_0_0_0_0_1_0_0_1_0_0_0|"
        );
        assert_eq!(lines[3].len(), lines[4].len());
        assert_eq!(lines[1].len(), lines[3].len());
    }

    #[test]
    fn undefined_words_do_not_decode() {
        assert!(ArmModeOpcode::try_from(0xE081_0002).is_err());
    }
}
