use rand::distributions::{Distribution, WeightedIndex};
use rand_core::RngCore;

use fount_core::{ConfigFault, FountResult};

const MASS_TOLERANCE: f64 = 1e-9;

/// Parameters of the robust soliton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolitonConfig {
    /// Ripple-size constant, typically 0.02..0.1.
    pub c: f64,
    /// Failure-probability bound, in (0, 1).
    pub delta: f64,
}

impl Default for SolitonConfig {
    fn default() -> Self {
        Self { c: 0.05, delta: 0.5 }
    }
}

impl SolitonConfig {
    pub fn validate(&self) -> FountResult<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(ConfigFault::Distribution("c must be positive").into());
        }
        if !(self.delta > 0.0 && self.delta < 1.0) {
            return Err(ConfigFault::Distribution("delta must lie in (0, 1)").into());
        }
        Ok(())
    }
}

/// Probability mass over unit degree `1..=k`. `pmf[0]` is always zero.
#[derive(Debug, Clone)]
pub struct DegreeDistribution {
    pmf: Vec<f64>,
    sampler: WeightedIndex<f64>,
}

impl DegreeDistribution {
    /// Ideal soliton: `1/k` at degree 1, `1/(i(i-1))` at degree `i >= 2`.
    pub fn ideal(k: usize) -> FountResult<Self> {
        Self::from_pmf(ideal_mass(k)?)
    }

    /// Robust soliton: the ideal soliton plus the ripple term `tau`,
    /// normalised.
    pub fn robust(k: usize, config: SolitonConfig) -> FountResult<Self> {
        config.validate()?;
        let mut mass = ideal_mass(k)?;

        let k_f = k as f64;
        let ripple = config.c * (k_f / config.delta).ln() * k_f.sqrt();
        let spike = (k_f / ripple).floor();

        if spike < 1.0 {
            // K/R below one: there is no spike position, all ripple mass
            // goes to degree 1.
            mass[1] += ripple / k_f;
        } else {
            let m = (spike as usize).min(k);
            let m_f = m as f64;
            for (i, p) in mass.iter_mut().enumerate().take(m).skip(1) {
                *p += 1.0 / (i as f64 * m_f);
            }
            // ln(R/delta) goes negative once R < delta (small K); that would
            // push the spike below zero.
            mass[m] += ((ripple / config.delta).ln() / m_f).max(0.0);
        }

        let total: f64 = mass.iter().sum();
        for p in &mut mass {
            *p /= total;
        }
        Self::from_pmf(mass)
    }

    /// A caller-supplied mass function, indexed by degree.
    pub fn from_pmf(pmf: Vec<f64>) -> FountResult<Self> {
        if pmf.len() < 2 {
            return Err(ConfigFault::NoSources.into());
        }
        if pmf[0] != 0.0 {
            return Err(ConfigFault::Distribution("degree 0 must carry no mass").into());
        }
        if pmf.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(ConfigFault::Distribution("mass must be finite and non-negative").into());
        }
        let total: f64 = pmf.iter().sum();
        if (total - 1.0).abs() > MASS_TOLERANCE {
            return Err(ConfigFault::Distribution("mass must sum to 1").into());
        }
        let sampler = WeightedIndex::new(&pmf[1..])
            .map_err(|_| ConfigFault::Distribution("no degree carries mass"))?;
        Ok(Self { pmf, sampler })
    }

    /// Largest degree.
    pub fn k(&self) -> usize {
        self.pmf.len() - 1
    }

    pub fn probability(&self, degree: usize) -> f64 {
        self.pmf.get(degree).copied().unwrap_or(0.0)
    }

    pub fn pmf(&self) -> &[f64] {
        &self.pmf
    }

    /// Draws one degree in `[1, k]`.
    pub fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> usize {
        self.sampler.sample(rng) + 1
    }
}

fn ideal_mass(k: usize) -> FountResult<Vec<f64>> {
    if k == 0 {
        return Err(ConfigFault::NoSources.into());
    }
    let mut mass = vec![0.0; k + 1];
    mass[1] = 1.0 / k as f64;
    for (i, p) in mass.iter_mut().enumerate().skip(2) {
        *p = 1.0 / (i as f64 * (i - 1) as f64);
    }
    Ok(mass)
}
