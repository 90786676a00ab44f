use alloc::vec::Vec;

use crate::{ConfigFault, FountResult, Symbol};

/// An XOR combination of the source (or intermediate) symbols listed in
/// `neighbors`. Neighbors are kept sorted and duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingUnit {
    id: u32,
    neighbors: Vec<u32>,
    value: Symbol,
}

impl EncodingUnit {
    pub fn new(id: u32, mut neighbors: Vec<u32>, value: Symbol) -> FountResult<Self> {
        if neighbors.is_empty() || neighbors.len() > u16::MAX as usize {
            return Err(ConfigFault::Degree {
                unit: id,
                degree: neighbors.len(),
                max: u16::MAX as usize,
            }
            .into());
        }
        if value.is_empty() {
            return Err(ConfigFault::EmptySymbol.into());
        }
        neighbors.sort_unstable();
        if let Some(pair) = neighbors.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConfigFault::DuplicateNeighbor { unit: id, index: pair[0] }.into());
        }
        Ok(Self { id, neighbors, value })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn neighbors(&self) -> &[u32] {
        &self.neighbors
    }

    pub fn value(&self) -> &Symbol {
        &self.value
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Validates the unit against a decode domain of `k` symbols of
    /// `symbol_len` bytes.
    pub fn check(&self, k: usize, symbol_len: usize) -> FountResult<()> {
        if self.degree() > k {
            return Err(ConfigFault::Degree { unit: self.id, degree: self.degree(), max: k }.into());
        }
        if let Some(&index) = self.neighbors.iter().find(|&&n| n as usize >= k) {
            return Err(ConfigFault::NeighborOutOfRange { unit: self.id, index, k }.into());
        }
        if self.value.len() != symbol_len {
            return Err(ConfigFault::SymbolLength { expected: symbol_len, got: self.value.len() }
                .into());
        }
        Ok(())
    }

    /// `value ^ XOR(sources[n] for n in neighbors)`. All-zero for a unit
    /// that was built from `sources`.
    pub fn residual(&self, sources: &[Symbol]) -> FountResult<Symbol> {
        self.check(sources.len(), self.value.len())?;
        let mut acc = self.value.clone();
        for &n in &self.neighbors {
            let src = &sources[n as usize];
            if src.len() != acc.len() {
                return Err(ConfigFault::SymbolLength { expected: acc.len(), got: src.len() }.into());
            }
            acc.xor_assign(src);
        }
        Ok(acc)
    }
}
