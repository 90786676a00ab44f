#![no_std]
#![forbid(unsafe_code)]
#[cfg(feature = "std")]
extern crate std;
extern crate alloc;

mod error;
mod outcome;
mod symbol;
mod unit;
pub mod wire;

pub use error::{ConfigFault, FountError, FountResult, WireFault};
pub use outcome::{Decoded, Partial, Shortfall};
pub use symbol::{uniform_len, Slot, Symbol};
pub use unit::EncodingUnit;
pub use wire::{StreamHeader, FOUNT_MAGIC, MAX_INTERMEDIATE, WIRE_VERSION};
