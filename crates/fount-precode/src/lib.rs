//! Sparse parity precode. Each parity position is the XOR of a few source
//! positions. Repair is local constraint propagation: it fills what the
//! received positions force and flags the rest.
//!
//! Random degree-3..5 graphs tolerate up to `p` erasures only empirically. At
//! most one source per constraint can ever be filled, so more than `p` missing
//! sources always leaves some unresolved.

#![forbid(unsafe_code)]

mod config;
mod graph;
mod repair;

pub use config::{PrecodeConfig, DEFAULT_MAX_DEGREE, DEFAULT_MAX_PASSES, DEFAULT_MIN_DEGREE};
pub use graph::{ParityConstraint, Precode};
pub use repair::RepairReport;
