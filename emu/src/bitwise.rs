use std::ops::RangeInclusive;

/// Contains some helper methods to manipulate bits,
/// the index (`bit_idx`) is supposed to be from lsb to msb (right to left).
pub trait Bits: Copy {
    /// Width of the implementing type in bits.
    const WIDTH: u8;

    fn get_bit(self, bit_idx: u8) -> bool;

    fn set_bit(&mut self, bit_idx: u8, value: bool);

    /// Extracts `bits_range` (inclusive on both ends) and moves it down to bit 0.
    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self;

    /// Returns a sign-extended copy of the value.
    /// `number_of_bits` is the width of the two's complement field being extended.
    fn sign_extended(self, number_of_bits: u8) -> Self;
}

macro_rules! impl_bits {
    ($($t:ty),*) => {
        $(
            impl Bits for $t {
                const WIDTH: u8 = <$t>::BITS as u8;

                fn get_bit(self, bit_idx: u8) -> bool {
                    debug_assert!(bit_idx < Self::WIDTH);
                    (self >> bit_idx) & 1 == 1
                }

                fn set_bit(&mut self, bit_idx: u8, value: bool) {
                    debug_assert!(bit_idx < Self::WIDTH);
                    let mask: $t = 1 << bit_idx;
                    if value {
                        *self |= mask;
                    } else {
                        *self &= !mask;
                    }
                }

                fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self {
                    let start = *bits_range.start();
                    let end = *bits_range.end();
                    debug_assert!(start <= end && end < Self::WIDTH);

                    // Shifting the field to the top and back down drops every bit
                    // outside of the range without building a mask.
                    let top_gap = Self::WIDTH - 1 - end;
                    (self << top_gap) >> (top_gap + start)
                }

                fn sign_extended(self, number_of_bits: u8) -> Self {
                    debug_assert!(number_of_bits > 0 && number_of_bits <= Self::WIDTH);

                    // XOR-ing with the sign mask clears the sign bit of negative values, the
                    // subtraction then borrows through every upper bit.
                    // In 4 bits: 0b1001 ^ 0b1000 = 0b0001, 0b0001 - 0b1000 = 0b1...1001 (-7).
                    let value = self.get_bits(0..=number_of_bits - 1);
                    let mask: $t = 1 << (number_of_bits - 1);
                    (value ^ mask).wrapping_sub(mask)
                }
            }
        )*
    };
}

impl_bits!(u8, u16, u32);
