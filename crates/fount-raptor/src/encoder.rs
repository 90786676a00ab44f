use rand_core::RngCore;

use fount_core::{ConfigFault, EncodingUnit, FountResult, Symbol};
use fount_lt::{DegreeDistribution, LtEncoder, SolitonConfig};
use fount_precode::Precode;

use crate::CodecConfig;

/// Precode outside, LT inside. Encoding runs the precode first and pours LT
/// units over the `k + p` intermediate symbols; decoding runs the layers in
/// reverse.
#[derive(Debug, Clone)]
pub struct CompositeCodec {
    pub(crate) precode: Precode,
    pub(crate) dist: DegreeDistribution,
}

impl CompositeCodec {
    pub fn new(config: &CodecConfig) -> FountResult<Self> {
        config.validate()?;
        let precode = Precode::build(&config.precode)?;
        Self::with_precode(precode, config.soliton)
    }

    /// Codec around an already built (or explicitly given) precode.
    pub fn with_precode(precode: Precode, soliton: SolitonConfig) -> FountResult<Self> {
        let dist = DegreeDistribution::robust(precode.intermediate_len(), soliton)?;
        Ok(Self { precode, dist })
    }

    pub fn k(&self) -> usize {
        self.precode.k()
    }

    pub fn p(&self) -> usize {
        self.precode.p()
    }

    pub fn intermediate_len(&self) -> usize {
        self.precode.intermediate_len()
    }

    pub fn precode(&self) -> &Precode {
        &self.precode
    }

    pub fn distribution(&self) -> &DegreeDistribution {
        &self.dist
    }

    /// Sources followed by parity.
    pub fn intermediate(&self, sources: &[Symbol]) -> FountResult<Vec<Symbol>> {
        self.precode.encode(sources)
    }

    /// Unbounded unit stream over an intermediate block from
    /// [`CompositeCodec::intermediate`].
    pub fn stream<'a>(&'a self, intermediate: &'a [Symbol]) -> FountResult<LtEncoder<'a>> {
        let expected = self.intermediate_len();
        if intermediate.len() != expected {
            return Err(ConfigFault::LengthMismatch { expected, got: intermediate.len() }.into());
        }
        LtEncoder::new(intermediate, &self.dist)
    }

    /// `count` units with ids `0..count`.
    pub fn encode<R: RngCore + ?Sized>(
        &self,
        sources: &[Symbol],
        count: usize,
        rng: &mut R,
    ) -> FountResult<Vec<EncodingUnit>> {
        let intermediate = self.intermediate(sources)?;
        let mut encoder = self.stream(&intermediate)?;
        (0..count).map(|_| encoder.next_unit(rng)).collect()
    }
}
