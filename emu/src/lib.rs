//! A small ARM (32-bit) execution core: a fetch/decode/execute engine running
//! against a memory-mapped bus of devices.
//!
//! ```no_run
//! use emu::config::SystemConfig;
//! use emu::machine::Machine;
//!
//! let image = std::fs::read("program.bin").unwrap();
//! let mut machine =
//!     Machine::new(&SystemConfig::default(), &image, Box::new(std::io::stdout())).unwrap();
//! machine.run(100).unwrap();
//! println!("{}", machine.cpu().state());
//! ```

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_possible_wrap)]
mod bitwise;

#[allow(clippy::missing_errors_doc)]
#[allow(clippy::cast_possible_truncation)]
pub mod bus;
pub mod config;
pub mod cpu;
pub mod error;

#[allow(clippy::missing_errors_doc)]
pub mod machine;
pub mod memory;
