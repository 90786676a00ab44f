//! LT fountain code: robust-soliton degree sampling, a streaming encoder and
//! a belief-propagation decoder with an exact GF(2) fallback.

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
pub mod soliton;

pub use decoder::{PeelState, PeelingDecoder};
pub use encoder::{encode, LtEncoder};
pub use soliton::{DegreeDistribution, SolitonConfig};

use fount_core::{Decoded, EncodingUnit, FountResult};
use log::debug;

/// Peeling decode of `k` sources. A stall is reported as
/// [`Decoded::Partial`] with the unresolved indices; nothing is guessed.
pub fn decode(units: &[EncodingUnit], k: usize) -> FountResult<Decoded> {
    let mut decoder = PeelingDecoder::new(units, k)?;
    decoder.run();
    Ok(decoder.into_decoded())
}

/// Peeling first; on a stall, re-solves the same units by Gaussian
/// elimination. The exact pass recovers every position peeling did and
/// possibly more.
pub fn decode_with_fallback(units: &[EncodingUnit], k: usize) -> FountResult<Decoded> {
    let mut decoder = PeelingDecoder::new(units, k)?;
    if decoder.run() == PeelState::Done {
        return Ok(decoder.into_decoded());
    }
    let Some(symbol_len) = units.first().map(|u| u.value().len()) else {
        return Ok(decoder.into_decoded());
    };
    debug!("peeling stalled at {}/{}, falling back to elimination", decoder.resolved(), k);
    fount_math::solve_units(units, k, symbol_len)
}
