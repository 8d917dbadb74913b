use std::io::Write;

use crate::error::EmuError;
use crate::memory::io_device::{IoDevice, Width};

/// Write-only port claiming a single address.
///
/// Byte writes are forwarded to the sink as raw bytes so a program can stream
/// text through it, wider writes are printed as a decimal number on their own
/// line. Nothing written here is visible to the emulated machine: reads
/// always return 0.
pub struct DebugOut {
    address: u32,
    sink: Box<dyn Write + Send>,
}

impl DebugOut {
    #[must_use]
    pub fn new(address: u32, sink: Box<dyn Write + Send>) -> Self {
        Self { address, sink }
    }

    fn emit(&mut self, width: Width, value: u32) {
        let written = match width {
            Width::Byte => self.sink.write_all(&[value as u8]),
            Width::HalfWord | Width::Word => writeln!(self.sink, "{value}"),
        };

        if let Err(e) = written.and_then(|()| self.sink.flush()) {
            tracing::warn!("debug output sink failed: {e}");
        }
    }
}

impl IoDevice for DebugOut {
    fn name(&self) -> &'static str {
        "debug-out"
    }

    fn contains(&self, address: u32, width: Width) -> bool {
        address == self.address && width.size() <= 4
    }

    fn read_at(&self, address: u32, width: Width) -> Result<u32, EmuError> {
        if !self.contains(address, width) {
            return Err(EmuError::UnmappedAddress { address, width });
        }

        Ok(0)
    }

    fn write_at(&mut self, address: u32, width: Width, value: u32) -> Result<(), EmuError> {
        if !self.contains(address, width) {
            return Err(EmuError::UnmappedAddress { address, width });
        }

        self.emit(width, width.truncate(value));

        Ok(())
    }
}

/// Cloneable in-memory sink, handy to observe what a program printed.
#[derive(Clone, Default)]
pub struct SharedBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl SharedBuffer {
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().map(|buf| buf.clone()).unwrap_or_default()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("debug buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
