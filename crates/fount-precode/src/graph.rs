use rand::seq::index;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

use fount_core::{uniform_len, ConfigFault, FountResult, Symbol};

use crate::config::{PrecodeConfig, DEFAULT_MAX_PASSES};

/// Parity position `k + j` equals the XOR of these source positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParityConstraint {
    sources: Vec<u32>,
}

impl ParityConstraint {
    /// Sorted, duplicate-free source indices.
    pub fn sources(&self) -> &[u32] {
        &self.sources
    }

    pub fn degree(&self) -> usize {
        self.sources.len()
    }
}

/// Sparse LDPC-style precode over `k` sources with `p` parity positions.
/// Intermediate layout: sources `0..k`, then parity `k..k+p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precode {
    pub(crate) k: usize,
    pub(crate) constraints: Vec<ParityConstraint>,
    pub(crate) max_passes: usize,
}

impl Precode {
    /// Graph derived from `config.seed`. Same config, same graph.
    pub fn build(config: &PrecodeConfig) -> FountResult<Self> {
        let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
        Self::build_with(config, &mut rng)
    }

    /// Graph drawn from a caller-supplied generator; `config.seed` is unused.
    pub fn build_with<R: RngCore + ?Sized>(config: &PrecodeConfig, rng: &mut R) -> FountResult<Self> {
        config.validate()?;
        let (lo, hi) = config.degree_range();

        let constraints = (0..config.p)
            .map(|_| {
                let degree = rng.gen_range(lo..=hi);
                let mut sources: Vec<u32> =
                    index::sample(rng, config.k, degree).into_iter().map(|i| i as u32).collect();
                sources.sort_unstable();
                ParityConstraint { sources }
            })
            .collect();

        Ok(Self { k: config.k, constraints, max_passes: config.max_passes })
    }

    /// Graph given explicitly, one source list per parity position.
    pub fn from_constraints(k: usize, lists: Vec<Vec<u32>>) -> FountResult<Self> {
        if k == 0 {
            return Err(ConfigFault::NoSources.into());
        }
        let mut constraints = Vec::with_capacity(lists.len());
        for (j, mut sources) in lists.into_iter().enumerate() {
            let unit = (k + j) as u32;
            if sources.is_empty() || sources.len() > k {
                return Err(ConfigFault::Degree { unit, degree: sources.len(), max: k }.into());
            }
            sources.sort_unstable();
            if let Some(&index) = sources.iter().find(|&&s| s as usize >= k) {
                return Err(ConfigFault::NeighborOutOfRange { unit, index, k }.into());
            }
            if let Some(pair) = sources.windows(2).find(|w| w[0] == w[1]) {
                return Err(ConfigFault::DuplicateNeighbor { unit, index: pair[0] }.into());
            }
            constraints.push(ParityConstraint { sources });
        }
        Ok(Self { k, constraints, max_passes: DEFAULT_MAX_PASSES })
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn p(&self) -> usize {
        self.constraints.len()
    }

    /// `k + p`.
    pub fn intermediate_len(&self) -> usize {
        self.k + self.constraints.len()
    }

    pub fn constraints(&self) -> &[ParityConstraint] {
        &self.constraints
    }

    /// Sources followed by one parity symbol per constraint.
    pub fn encode(&self, sources: &[Symbol]) -> FountResult<Vec<Symbol>> {
        if sources.len() != self.k {
            return Err(ConfigFault::LengthMismatch { expected: self.k, got: sources.len() }.into());
        }
        let symbol_len = uniform_len(sources)?;

        let mut intermediate = Vec::with_capacity(self.intermediate_len());
        intermediate.extend_from_slice(sources);
        for c in &self.constraints {
            let mut parity = Symbol::zeroed(symbol_len);
            for &s in &c.sources {
                parity.xor_assign(&sources[s as usize]);
            }
            intermediate.push(parity);
        }
        Ok(intermediate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fount_core::FountError;

    #[test]
    fn explicit_graph_is_validated() {
        assert!(Precode::from_constraints(4, vec![vec![0, 1, 2]]).is_ok());
        assert!(Precode::from_constraints(0, vec![]).is_err());
        assert!(Precode::from_constraints(4, vec![vec![]]).is_err());
        assert_eq!(
            Precode::from_constraints(4, vec![vec![0, 1], vec![1, 4]]),
            Err(FountError::InvalidConfig(ConfigFault::NeighborOutOfRange { unit: 5, index: 4, k: 4 }))
        );
        assert_eq!(
            Precode::from_constraints(4, vec![vec![2, 0, 2]]),
            Err(FountError::InvalidConfig(ConfigFault::DuplicateNeighbor { unit: 4, index: 2 }))
        );
    }

    #[test]
    fn encode_appends_parity() {
        let pc = Precode::from_constraints(3, vec![vec![0, 2], vec![0, 1, 2]]).unwrap();
        let src = vec![Symbol::from(vec![1]), Symbol::from(vec![2]), Symbol::from(vec![4])];
        let out = pc.encode(&src).unwrap();
        assert_eq!(out.len(), pc.intermediate_len());
        assert_eq!(out[3], Symbol::from(vec![1 ^ 4]));
        assert_eq!(out[4], Symbol::from(vec![1 ^ 2 ^ 4]));
        assert!(pc.encode(&src[..2]).is_err());
    }
}
