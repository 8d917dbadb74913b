#[allow(clippy::cast_possible_truncation)]
pub mod debug_out;
pub mod io_device;

#[allow(clippy::cast_possible_truncation)]
pub mod ram;
