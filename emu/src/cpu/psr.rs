//! # Program Status Register
//!
//! The status word holds the condition flags and the control bits:
//!
//! ```text
//! 31 30 29 28 27      8 7 6 5 4   0
//! ┌──┬──┬──┬──┬─────────┬─┬─┬─┬─────┐
//! │N │Z │C │V │Reserved │I│F│T│Mode │
//! └──┴──┴──┴──┴─────────┴─┴─┴─┴─────┘
//! ```
//!
//! [`Psr`] keeps each field separately and converts to and from this packed
//! layout (`u32::from(psr)` / `Psr::from(raw)`) when a bit-exact value is
//! needed. Reserved bits are not stored and read back as 0.

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;
use crate::cpu::arm::alu_instruction::ArithmeticOpResult;
use crate::cpu::condition::Condition;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Psr {
    sign: bool,
    zero: bool,
    carry: bool,
    overflow: bool,
    irq_disable: bool,
    fiq_disable: bool,
    state_bit: bool,
    mode: u8,
}

impl Psr {
    #[must_use]
    pub const fn can_execute(self, cond: Condition) -> bool {
        use Condition::{AL, CC, CS, EQ, GE, GT, HI, LE, LS, LT, MI, NE, NV, PL, VC, VS};
        match cond {
            EQ => self.zero,                                   // Equal (Z=1)
            NE => !self.zero,                                  // Not equal (Z=0)
            CS => self.carry,                                  // Unsigned higher or same (C=1)
            CC => !self.carry,                                 // Unsigned lower (C=0)
            MI => self.sign,                                   // Negative (N=1)
            PL => !self.sign,                                  // Positive or zero (N=0)
            VS => self.overflow,                               // Overflow (V=1)
            VC => !self.overflow,                              // No overflow (V=0)
            HI => self.carry && !self.zero,                    // Unsigned higher (C=1 and Z=0)
            LS => !self.carry || self.zero,                    // Unsigned lower or same (C=0 or Z=1)
            GE => self.sign == self.overflow,                  // Greater or equal (N=V)
            LT => self.sign != self.overflow,                  // Less than (N<>V)
            GT => !self.zero && (self.sign == self.overflow),  // Greater than (Z=0 and N=V)
            LE => self.zero || (self.sign != self.overflow),   // Less or equal (Z=1 or N<>V)
            AL => true,
            NV => false,
        }
    }

    /// N => Bit 31, (0=Not Signed, 1=Signed)
    #[must_use]
    pub const fn sign_flag(self) -> bool {
        self.sign
    }

    /// Z => Bit 30, (0=Not Zero, 1=Zero)
    #[must_use]
    pub const fn zero_flag(self) -> bool {
        self.zero
    }

    /// C => Bit 29, (0=Borrow/No Carry, 1=Carry/No Borrow)
    #[must_use]
    pub const fn carry_flag(self) -> bool {
        self.carry
    }

    /// V => Bit 28, (0=No Overflow, 1=Overflow)
    #[must_use]
    pub const fn overflow_flag(self) -> bool {
        self.overflow
    }

    /// I => Bit 7, (0=Enable, 1=Disable)
    #[must_use]
    pub const fn irq_disable(self) -> bool {
        self.irq_disable
    }

    /// F => Bit 6, (0=Enable, 1=Disable)
    #[must_use]
    pub const fn fiq_disable(self) -> bool {
        self.fiq_disable
    }

    /// T => Bit 5, (0=ARM, 1=THUMB). Always 0 on this core.
    #[must_use]
    pub const fn state_bit(self) -> bool {
        self.state_bit
    }

    /// M4-M0 => Bits 4-0, kept raw.
    #[must_use]
    pub const fn mode(self) -> u8 {
        self.mode
    }

    pub const fn set_sign_flag(&mut self, value: bool) {
        self.sign = value;
    }

    pub const fn set_zero_flag(&mut self, value: bool) {
        self.zero = value;
    }

    pub const fn set_carry_flag(&mut self, value: bool) {
        self.carry = value;
    }

    pub const fn set_overflow_flag(&mut self, value: bool) {
        self.overflow = value;
    }

    pub const fn set_irq_disable(&mut self, value: bool) {
        self.irq_disable = value;
    }

    pub const fn set_fiq_disable(&mut self, value: bool) {
        self.fiq_disable = value;
    }

    pub const fn set_state_bit(&mut self, value: bool) {
        self.state_bit = value;
    }

    /// Only the low 5 bits are kept.
    pub const fn set_mode_raw(&mut self, m: u8) {
        self.mode = m & 0b1_1111;
    }

    /// Updates all four condition flags from an arithmetic result.
    pub const fn set_flags(&mut self, op_result: &ArithmeticOpResult) {
        self.set_carry_flag(op_result.carry);
        self.set_zero_flag(op_result.zero);
        self.set_sign_flag(op_result.sign);
        self.set_overflow_flag(op_result.overflow);
    }

    /// Updates N and Z from a moved or logical value, C and V are left alone.
    pub fn set_sign_and_zero(&mut self, value: u32) {
        self.set_sign_flag(value.get_bit(31));
        self.set_zero_flag(value == 0);
    }
}

impl From<Psr> for u32 {
    fn from(p: Psr) -> Self {
        let mut raw = 0_u32;
        raw.set_bit(31, p.sign);
        raw.set_bit(30, p.zero);
        raw.set_bit(29, p.carry);
        raw.set_bit(28, p.overflow);
        raw.set_bit(7, p.irq_disable);
        raw.set_bit(6, p.fiq_disable);
        raw.set_bit(5, p.state_bit);
        raw | Self::from(p.mode)
    }
}

impl From<u32> for Psr {
    fn from(raw: u32) -> Self {
        Self {
            sign: raw.get_bit(31),
            zero: raw.get_bit(30),
            carry: raw.get_bit(29),
            overflow: raw.get_bit(28),
            irq_disable: raw.get_bit(7),
            fiq_disable: raw.get_bit(6),
            state_bit: raw.get_bit(5),
            mode: raw.get_bits(0..=4) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_cleared() {
        let cpsr = Psr::default();
        assert_eq!(u32::from(cpsr), 0);
        assert_eq!(cpsr.mode(), 0);
        assert!(!cpsr.state_bit());
    }

    #[test]
    fn check_sign_flag() {
        let mut cpsr = Psr::default();
        cpsr.set_sign_flag(true);
        assert!(cpsr.sign_flag());
        assert_eq!(u32::from(cpsr), 0x8000_0000);
    }

    #[test]
    fn check_zero_flag() {
        let mut cpsr = Psr::default();
        cpsr.set_zero_flag(true);
        assert!(cpsr.zero_flag());
        assert_eq!(u32::from(cpsr), 0x4000_0000);
    }

    #[test]
    fn check_carry_flag() {
        let mut cpsr = Psr::default();
        cpsr.set_carry_flag(true);
        assert!(cpsr.carry_flag());
        assert_eq!(u32::from(cpsr), 0x2000_0000);
    }

    #[test]
    fn check_overflow_flag() {
        let cpsr = Psr::from(0b0001_0000_0000_0000_0000_0000_0000_0000);
        assert!(cpsr.overflow_flag());
        assert!(!cpsr.carry_flag());
    }

    #[test]
    fn check_control_bits() {
        let mut cpsr = Psr::default();
        cpsr.set_irq_disable(true);
        cpsr.set_fiq_disable(true);
        cpsr.set_state_bit(true);
        cpsr.set_mode_raw(0b1001_0011);
        assert_eq!(u32::from(cpsr), 0b1111_0011);
        assert_eq!(cpsr.mode(), 0b1_0011);
    }

    #[test]
    fn packed_layout_round_trips_and_drops_reserved_bits() {
        let raw = 0xF000_00FF;
        assert_eq!(u32::from(Psr::from(raw)), raw);

        let with_reserved = 0x0FFF_FF00;
        assert_eq!(Psr::from(with_reserved), Psr::default());
    }

    #[test]
    fn sign_and_zero_leave_carry_and_overflow() {
        let mut cpsr = Psr::default();
        cpsr.set_carry_flag(true);
        cpsr.set_overflow_flag(true);

        cpsr.set_sign_and_zero(0);
        assert!(cpsr.zero_flag());
        assert!(!cpsr.sign_flag());
        assert!(cpsr.carry_flag());
        assert!(cpsr.overflow_flag());

        cpsr.set_sign_and_zero(0x8000_0000);
        assert!(!cpsr.zero_flag());
        assert!(cpsr.sign_flag());
    }
}
