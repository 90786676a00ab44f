//! Gauss-Jordan elimination over GF(2) on an augmented matrix whose right-hand
//! side is a symbol per row. Row addition is XOR; there is no scaling step
//! because the only nonzero scalar is 1.
//!
//! Cubic in the matrix size. Use it as the exact reference decode, not on the
//! hot path for large K.

use alloc::vec::Vec;
use core::mem;
use log::{debug, warn};
use zeroize::Zeroize;

use fount_core::{
    ConfigFault, Decoded, EncodingUnit, FountError, FountResult, Shortfall, Slot, Symbol,
};

use crate::BitRow;

/// Augmented matrix `[A | b]`: `cols` unknowns, one symbol per row on the right.
#[derive(Debug, Clone, Zeroize)]
pub struct BinaryMatrix {
    cols: usize,
    symbol_len: usize,
    rows: Vec<BitRow>,
    rhs: Vec<Symbol>,
}

impl BinaryMatrix {
    pub fn new(cols: usize, symbol_len: usize) -> FountResult<Self> {
        if cols == 0 {
            return Err(ConfigFault::NoSources.into());
        }
        if symbol_len == 0 {
            return Err(ConfigFault::EmptySymbol.into());
        }
        Ok(Self { cols, symbol_len, rows: Vec::new(), rhs: Vec::new() })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn push_row(&mut self, coeffs: BitRow, value: Symbol) -> FountResult<()> {
        if coeffs.len() != self.cols {
            return Err(ConfigFault::LengthMismatch { expected: self.cols, got: coeffs.len() }.into());
        }
        if value.len() != self.symbol_len {
            return Err(ConfigFault::SymbolLength { expected: self.symbol_len, got: value.len() }
                .into());
        }
        self.rows.push(coeffs);
        self.rhs.push(value);
        Ok(())
    }

    pub fn push_unit(&mut self, unit: &EncodingUnit) -> FountResult<()> {
        unit.check(self.cols, self.symbol_len)?;
        self.push_row(BitRow::from_indices(self.cols, unit.neighbors()), unit.value().clone())
    }

    /// Reduced row-echelon form. For each column left to right: find a row at
    /// or below the pivot row with a 1, swap it up, then clear that column in
    /// every other row, above and below.
    pub fn reduce(mut self) -> Echelon {
        let rows = self.rows.len();
        let mut pivots = Vec::new();
        let mut pivot_row = 0;

        for col in 0..self.cols {
            if pivot_row >= rows {
                break;
            }

            // 1. Search
            let Some(found) = (pivot_row..rows).find(|&r| self.rows[r].get(col)) else {
                continue;
            };

            // 2. Swap
            if found != pivot_row {
                self.rows.swap(found, pivot_row);
                self.rhs.swap(found, pivot_row);
            }
            pivots.push(col);

            // 3. Eliminate
            let pivot = self.rows[pivot_row].clone();
            let mut pivot_rhs = self.rhs[pivot_row].clone();
            for r in 0..rows {
                if r != pivot_row && self.rows[r].get(col) {
                    self.rows[r].xor_assign(&pivot);
                    self.rhs[r].xor_assign(&pivot_rhs);
                }
            }
            pivot_rhs.zeroize();
            pivot_row += 1;
        }

        let rank = pivots.len();
        Echelon {
            cols: self.cols,
            rows: mem::take(&mut self.rows),
            rhs: mem::take(&mut self.rhs),
            pivots,
            rank,
        }
    }
}

impl Drop for BinaryMatrix {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// The reduced form produced by [`BinaryMatrix::reduce`]. Rows `0..rank`
/// carry pivots in ascending column order; rows from `rank` on have all-zero
/// coefficients. Rows and values are wiped on drop.
#[derive(Debug, Clone, Zeroize)]
pub struct Echelon {
    cols: usize,
    rows: Vec<BitRow>,
    rhs: Vec<Symbol>,
    pivots: Vec<usize>,
    rank: usize,
}

impl Echelon {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> Option<(&BitRow, &Symbol)> {
        Some((self.rows.get(i)?, self.rhs.get(i)?))
    }

    /// First zero-coefficient row whose value is not zero, if any.
    pub fn inconsistent_row(&self) -> Option<usize> {
        (self.rank..self.rows.len()).find(|&r| !self.rhs[r].is_zero())
    }

    /// One slot per unknown, in original variable order. An unknown is known
    /// only when its pivot row has no other 1: a row touching a free column
    /// does not pin its pivot variable down.
    pub fn solution(&self) -> Vec<Slot> {
        let mut slots = alloc::vec![Slot::Unknown; self.cols];
        for (r, &col) in self.pivots.iter().enumerate() {
            if self.rows[r].count_ones() == 1 {
                slots[col] = Slot::Known(self.rhs[r].clone());
            }
        }
        slots
    }

    pub fn into_decoded(mut self) -> FountResult<Decoded> {
        if let Some(row) = self.inconsistent_row() {
            warn!("binary system inconsistent at reduced row {}", row);
            return Err(FountError::Inconsistent { row });
        }
        let slots = self.solution();
        if self.rank < self.cols {
            debug!("rank {} of {} unknowns", self.rank, self.cols);
        }
        Ok(Decoded::from_slots(
            slots,
            Shortfall::RankDeficient { rank: self.rank, pivots: mem::take(&mut self.pivots) },
        ))
    }
}

impl Drop for Echelon {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Exact decode of `k` unknowns from encoding units.
pub fn solve_units(units: &[EncodingUnit], k: usize, symbol_len: usize) -> FountResult<Decoded> {
    let mut matrix = BinaryMatrix::new(k, symbol_len)?;
    for unit in units {
        matrix.push_unit(unit)?;
    }
    matrix.reduce().into_decoded()
}
