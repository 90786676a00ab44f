#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod bits;
pub mod solver;

pub use bits::BitRow;
pub use solver::{solve_units, BinaryMatrix, Echelon};
