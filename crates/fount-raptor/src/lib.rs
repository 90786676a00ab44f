//! Two-layer codec: a sparse parity precode under an LT fountain code.
//!
//! The LT layer alone fails all-or-nothing when its ripple empties. The
//! precode turns that stall into a small deficit it can often repair locally,
//! and the repaired values can restart peeling.

#![forbid(unsafe_code)]

mod config;
mod decoder;
mod encoder;

pub use config::CodecConfig;
pub use decoder::BridgeReport;
pub use encoder::CompositeCodec;
