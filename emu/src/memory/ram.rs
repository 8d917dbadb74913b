use crate::error::EmuError;
use crate::memory::io_device::{IoDevice, Width};

/// Zero-initialized, fixed-size backing store mapped at `base`.
///
/// Multi-byte accesses are little-endian and need not be aligned.
pub struct Ram {
    base: u32,
    data: Vec<u8>,
}

impl Ram {
    #[must_use]
    pub fn new(base: u32, size: u32) -> Self {
        Self {
            base,
            data: vec![0; size as usize],
        }
    }

    /// Copies `image` into the store starting at the absolute `address`.
    /// Bytes outside the image keep their previous value.
    pub fn load_at(&mut self, address: u32, image: &[u8]) -> Result<(), EmuError> {
        let out_of_bounds = EmuError::ImageOutOfBounds {
            address,
            len: image.len(),
        };

        let start = self.offset_of(address).ok_or(out_of_bounds)?;
        let end = start.checked_add(image.len()).ok_or(out_of_bounds)?;
        if end > self.data.len() {
            return Err(out_of_bounds);
        }

        self.data[start..end].copy_from_slice(image);

        tracing::debug!("loaded {} bytes at 0x{address:08X}", image.len());

        Ok(())
    }

    fn offset_of(&self, address: u32) -> Option<usize> {
        let offset = address.checked_sub(self.base)? as usize;
        (offset < self.data.len()).then_some(offset)
    }

    fn checked_range(&self, address: u32, width: Width) -> Result<usize, EmuError> {
        if self.contains(address, width) {
            Ok((address - self.base) as usize)
        } else {
            Err(EmuError::UnmappedAddress { address, width })
        }
    }
}

impl IoDevice for Ram {
    fn name(&self) -> &'static str {
        "ram"
    }

    fn contains(&self, address: u32, width: Width) -> bool {
        let Some(offset) = address.checked_sub(self.base) else {
            return false;
        };

        // Done in u64 so an access straddling the top of the address space is
        // rejected instead of wrapping.
        u64::from(offset) + u64::from(width.size()) <= self.data.len() as u64
    }

    fn read_at(&self, address: u32, width: Width) -> Result<u32, EmuError> {
        let start = self.checked_range(address, width)?;
        let bytes = &self.data[start..start + width.size() as usize];

        Ok(bytes
            .iter()
            .rev()
            .fold(0_u32, |acc, &byte| (acc << 8) | u32::from(byte)))
    }

    fn write_at(&mut self, address: u32, width: Width, value: u32) -> Result<(), EmuError> {
        let start = self.checked_range(address, width)?;
        let bytes = value.to_le_bytes();
        let size = width.size() as usize;

        self.data[start..start + size].copy_from_slice(&bytes[..size]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let ram = Ram::new(0, 0x100);
        assert_eq!(ram.read_at(0x00, Width::Word), Ok(0));
        assert_eq!(ram.read_at(0xFC, Width::Word), Ok(0));
    }

    #[test]
    fn contains_respects_access_size() {
        let ram = Ram::new(0x1000, 0x10);
        assert!(ram.contains(0x1000, Width::Word));
        assert!(ram.contains(0x100C, Width::Word));
        assert!(!ram.contains(0x100D, Width::Word));
        assert!(ram.contains(0x100F, Width::Byte));
        assert!(!ram.contains(0x1010, Width::Byte));
        assert!(!ram.contains(0x0FFF, Width::Byte));
    }

    #[test]
    fn contains_does_not_wrap_at_top_of_address_space() {
        let ram = Ram::new(0xFFFF_FFF0, 0x10);
        assert!(ram.contains(0xFFFF_FFFC, Width::Word));
        assert!(!ram.contains(0xFFFF_FFFE, Width::Word));
    }

    #[test]
    fn little_endian_layout() {
        let mut ram = Ram::new(0, 0x10);
        ram.write_at(0x4, Width::Word, 0x1122_3344).unwrap();

        assert_eq!(ram.read_at(0x4, Width::Byte), Ok(0x44));
        assert_eq!(ram.read_at(0x7, Width::Byte), Ok(0x11));
        assert_eq!(ram.read_at(0x4, Width::HalfWord), Ok(0x3344));
        assert_eq!(ram.read_at(0x6, Width::HalfWord), Ok(0x1122));

        ram.write_at(0x5, Width::Byte, 0xABCD).unwrap();
        assert_eq!(ram.read_at(0x4, Width::Word), Ok(0x1122_CD44));
    }

    #[test]
    fn out_of_range_access_is_refused() {
        let mut ram = Ram::new(0, 0x10);
        assert_eq!(
            ram.read_at(0x10, Width::Byte),
            Err(EmuError::UnmappedAddress {
                address: 0x10,
                width: Width::Byte
            })
        );
        assert_eq!(
            ram.write_at(0xE, Width::Word, 1),
            Err(EmuError::UnmappedAddress {
                address: 0xE,
                width: Width::Word
            })
        );
    }

    #[test]
    fn load_at_copies_image_and_keeps_the_rest_zero() {
        let mut ram = Ram::new(0x100, 0x20);
        ram.load_at(0x104, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();

        assert_eq!(ram.read_at(0x100, Width::Word), Ok(0));
        assert_eq!(ram.read_at(0x104, Width::Word), Ok(0xEFBE_ADDE));
        assert_eq!(ram.read_at(0x108, Width::Word), Ok(0));
    }

    #[test]
    fn load_at_rejects_images_past_the_end() {
        let mut ram = Ram::new(0, 0x8);
        assert_eq!(
            ram.load_at(0x4, &[0; 5]),
            Err(EmuError::ImageOutOfBounds { address: 4, len: 5 })
        );
        assert_eq!(
            ram.load_at(0x8, &[0]),
            Err(EmuError::ImageOutOfBounds { address: 8, len: 1 })
        );
        assert!(ram.load_at(0x0, &[1; 8]).is_ok());
    }
}
