use fount_core::{ConfigFault, FountResult};

pub const DEFAULT_MIN_DEGREE: usize = 3;
pub const DEFAULT_MAX_DEGREE: usize = 5;
pub const DEFAULT_MAX_PASSES: usize = 100;

/// Everything both sides need to rebuild the same constraint graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecodeConfig {
    pub k: usize,
    pub p: usize,
    pub min_degree: usize,
    pub max_degree: usize,
    pub seed: u64,
    /// Cap on full repair passes.
    pub max_passes: usize,
}

impl PrecodeConfig {
    pub fn new(k: usize, p: usize, seed: u64) -> Self {
        Self {
            k,
            p,
            min_degree: DEFAULT_MIN_DEGREE,
            max_degree: DEFAULT_MAX_DEGREE,
            seed,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    pub fn with_degrees(mut self, min_degree: usize, max_degree: usize) -> Self {
        self.min_degree = min_degree;
        self.max_degree = max_degree;
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn validate(&self) -> FountResult<()> {
        if self.k == 0 {
            return Err(ConfigFault::NoSources.into());
        }
        if self.min_degree == 0 || self.min_degree > self.max_degree {
            return Err(ConfigFault::DegreeBounds { min: self.min_degree, max: self.max_degree }
                .into());
        }
        Ok(())
    }

    /// Degree range actually drawn from: a constraint cannot name more
    /// distinct sources than there are.
    pub fn degree_range(&self) -> (usize, usize) {
        (self.min_degree.min(self.k), self.max_degree.min(self.k))
    }
}
