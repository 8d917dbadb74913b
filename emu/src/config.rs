//! Memory map and run parameters of the assembled machine.
//!
//! Every field has a default, so `{}` is a valid configuration:
//!
//! ```json
//! {
//!   "ram_base": 0,
//!   "ram_size": 65536,
//!   "debug_out_address": 65536,
//!   "load_address": 0,
//!   "entry_point": 0,
//!   "step_count": 100,
//!   "overflow_rule": "literal"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::cpu::arm::alu_instruction::OverflowRule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    pub ram_base: u32,
    pub ram_size: u32,
    pub debug_out_address: u32,

    /// Where the raw image is copied.
    pub load_address: u32,

    /// Initial PC.
    pub entry_point: u32,

    /// Number of steps the driver runs.
    pub step_count: usize,

    pub overflow_rule: OverflowRule,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ram_base: 0,
            ram_size: 64 * 1024,
            debug_out_address: 0x0001_0000,
            load_address: 0,
            entry_point: 0,
            step_count: 100,
            overflow_rule: OverflowRule::Literal,
        }
    }
}

impl SystemConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_the_default() {
        assert_eq!(SystemConfig::from_json("{}").unwrap(), SystemConfig::default());
    }

    #[test]
    fn default_map_puts_debug_out_right_after_ram() {
        let config = SystemConfig::default();
        assert_eq!(config.ram_base + config.ram_size, config.debug_out_address);
        assert_eq!(config.step_count, 100);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = SystemConfig::from_json(
            r#"{ "step_count": 7, "overflow_rule": "architectural", "ram_size": 4096 }"#,
        )
        .unwrap();

        assert_eq!(
            config,
            SystemConfig {
                ram_size: 4096,
                step_count: 7,
                overflow_rule: OverflowRule::Architectural,
                ..SystemConfig::default()
            }
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = SystemConfig::from_json(r#"{ "rom_size": 1 }"#).unwrap_err();
        assert!(err.to_string().contains("rom_size"), "{err}");
    }

    #[test]
    fn bad_overflow_rule_is_rejected() {
        assert!(SystemConfig::from_json(r#"{ "overflow_rule": "fixed" }"#).is_err());
    }

    #[test]
    fn serializes_back_to_the_same_config() {
        let config = SystemConfig {
            load_address: 0x100,
            entry_point: 0x100,
            ..SystemConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SystemConfig::from_json(&json).unwrap(), config);
    }
}
