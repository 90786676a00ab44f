use rand::seq::index;
use rand_core::RngCore;

use fount_core::{uniform_len, ConfigFault, EncodingUnit, FountResult, Symbol};

use crate::DegreeDistribution;

/// Pours encoding units over a fixed set of source symbols. Unbounded: call
/// [`LtEncoder::next_unit`] for as long as the channel needs more.
pub struct LtEncoder<'a> {
    sources: &'a [Symbol],
    dist: &'a DegreeDistribution,
    symbol_len: usize,
    /// `None` once the id space is used up.
    cursor: Option<u32>,
}

impl<'a> LtEncoder<'a> {
    pub fn new(sources: &'a [Symbol], dist: &'a DegreeDistribution) -> FountResult<Self> {
        let symbol_len = uniform_len(sources)?;
        Ok(Self { sources, dist, symbol_len, cursor: Some(0) })
    }

    /// Ids continue from `start`, for a stream resumed by a second encoder.
    pub fn with_start_id(mut self, start: u32) -> Self {
        self.cursor = Some(start);
        self
    }

    pub fn num_sources(&self) -> usize {
        self.sources.len()
    }

    pub fn symbol_len(&self) -> usize {
        self.symbol_len
    }

    /// Id the next unit will carry, `None` after the unit with id
    /// `u32::MAX` has been produced.
    pub fn cursor(&self) -> Option<u32> {
        self.cursor
    }

    pub fn next_unit<R: RngCore + ?Sized>(&mut self, rng: &mut R) -> FountResult<EncodingUnit> {
        let k = self.sources.len();
        let Some(id) = self.cursor else {
            return Err(ConfigFault::Overflow { field: "id", value: (u32::MAX as usize).saturating_add(1) }
                .into());
        };
        self.cursor = id.checked_add(1);

        // 1. Degree, clamped into [1, K] whatever the distribution's range
        let degree = self.dist.sample(rng).clamp(1, k);

        // 2. Distinct neighbors, uniform without replacement
        let picked = index::sample(rng, k, degree);
        let neighbors: Vec<u32> = picked.into_iter().map(|i| i as u32).collect();

        // 3. XOR of the chosen sources
        let mut value = Symbol::zeroed(self.symbol_len);
        for &n in &neighbors {
            value.xor_assign(&self.sources[n as usize]);
        }

        EncodingUnit::new(id, neighbors, value)
    }
}

/// `count` units with ids `0..count`.
pub fn encode<R: RngCore + ?Sized>(
    sources: &[Symbol],
    count: usize,
    dist: &DegreeDistribution,
    rng: &mut R,
) -> FountResult<Vec<EncodingUnit>> {
    let mut encoder = LtEncoder::new(sources, dist)?;
    (0..count).map(|_| encoder.next_unit(rng)).collect()
}
