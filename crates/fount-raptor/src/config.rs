use fount_core::{ConfigFault, FountResult, StreamHeader};
use fount_lt::SolitonConfig;
use fount_precode::PrecodeConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodecConfig {
    pub precode: PrecodeConfig,
    /// Degree distribution over the `k + p` intermediate symbols. Only the
    /// encoder needs it.
    pub soliton: SolitonConfig,
}

impl CodecConfig {
    pub fn new(k: usize, p: usize, seed: u64) -> Self {
        Self { precode: PrecodeConfig::new(k, p, seed), soliton: SolitonConfig::default() }
    }

    pub fn with_soliton(mut self, soliton: SolitonConfig) -> Self {
        self.soliton = soliton;
        self
    }

    pub fn validate(&self) -> FountResult<()> {
        self.precode.validate()?;
        self.soliton.validate()
    }

    /// Stream header announcing this precode for `count` units of
    /// `symbol_len` bytes. Fails for anything a receiver would refuse.
    pub fn header(&self, symbol_len: usize, count: usize) -> FountResult<StreamHeader> {
        let pc = &self.precode;
        let header = StreamHeader {
            k: narrow(pc.k, "k")?,
            p: narrow(pc.p, "p")?,
            symbol_len: narrow(symbol_len, "symbol_len")?,
            min_degree: narrow(pc.min_degree, "min_degree")?,
            max_degree: narrow(pc.max_degree, "max_degree")?,
            seed: pc.seed,
            count: narrow(count, "count")?,
        };
        header.validate()?;
        Ok(header)
    }

    /// Receiver side: the precode announced by `header`, default soliton.
    /// Headers outside [`StreamHeader::validate`] are refused before any
    /// decoder state is sized from them.
    pub fn from_header(header: &StreamHeader) -> FountResult<Self> {
        header.validate()?;
        let precode = PrecodeConfig::new(header.k as usize, header.p as usize, header.seed)
            .with_degrees(header.min_degree as usize, header.max_degree as usize);
        Ok(Self { precode, soliton: SolitonConfig::default() })
    }
}

fn narrow<T: TryFrom<usize>>(value: usize, field: &'static str) -> FountResult<T> {
    T::try_from(value).map_err(|_| ConfigFault::Overflow { field, value }.into())
}
