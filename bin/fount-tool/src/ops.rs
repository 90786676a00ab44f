use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use log::info;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

use fount_core::{ConfigFault, Decoded, FountResult, StreamHeader, Symbol};
use fount_raptor::{CodecConfig, CompositeCodec};

use crate::stream;

pub struct EncodeOpts {
    pub symbol_len: usize,
    /// Units to emit. `None` means 1.5 x (K + P).
    pub count: Option<usize>,
    pub parity: usize,
    pub seed: u64,
    /// Seed for the unit stream. `None` draws fresh entropy.
    pub stream_seed: Option<u64>,
}

/// Splits `data` into `symbol_len` byte symbols. No padding: the last
/// symbol must be whole.
pub fn split_symbols(data: &[u8], symbol_len: usize) -> FountResult<Vec<Symbol>> {
    if symbol_len == 0 {
        return Err(ConfigFault::EmptySymbol.into());
    }
    if data.is_empty() {
        return Err(ConfigFault::NoSources.into());
    }
    if data.len() % symbol_len != 0 {
        return Err(ConfigFault::SymbolLength { expected: symbol_len, got: data.len() % symbol_len }.into());
    }
    Ok(data.chunks(symbol_len).map(Symbol::from).collect())
}

/// Encodes `input` into a unit stream at `output`. Returns the units written.
pub fn encode_file(input: &Path, output: &Path, opts: &EncodeOpts) -> anyhow::Result<usize> {
    let data = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let sources = split_symbols(&data, opts.symbol_len)?;

    let config = CodecConfig::new(sources.len(), opts.parity, opts.seed);
    let codec = CompositeCodec::new(&config)?;
    let count = opts.count.unwrap_or(codec.intermediate_len() * 3 / 2);
    let header = config.header(opts.symbol_len, count)?;

    let mut rng: Box<dyn RngCore> = match opts.stream_seed {
        Some(s) => Box::new(ChaCha20Rng::seed_from_u64(s)),
        None => Box::new(rand::thread_rng()),
    };
    let units = codec.encode(&sources, count, &mut *rng)?;

    stream::write(output, &header, &units)?;
    info!("K={} P={} -> {} units of {} bytes", codec.k(), codec.p(), count, opts.symbol_len);
    Ok(count)
}

/// Rebuilds the file behind the stream at `input` and writes it to `output`.
/// Returns the number of sources recovered. A partial decode is an error
/// carrying the decoder's [`fount_core::FountError`], and nothing is written.
pub fn decode_file(input: &Path, output: &Path, exact: bool) -> anyhow::Result<usize> {
    let stream = stream::read(input)?;
    let codec = CompositeCodec::new(&CodecConfig::from_header(&stream.header)?)?;

    let decoded = if exact {
        codec.decode_exact(&stream.units)?
    } else {
        let (decoded, report) = codec.decode_with_report(&stream.units)?;
        info!("{:?}", report);
        decoded
    };

    match decoded {
        Decoded::Recovered { sources } => {
            let recovered = sources.len();
            let bytes: Vec<u8> = sources.into_iter().flat_map(Symbol::into_bytes).collect();
            std::fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
            Ok(recovered)
        }
        Decoded::Partial(partial) => {
            let missing: Vec<u32> = partial.unresolved().into_iter().collect();
            let found = partial.resolved();
            Err(anyhow::Error::new(partial.into_error()).context(format!(
                "{} units recovered {}/{} sources, missing {:?}",
                stream.units.len(),
                found,
                codec.k(),
                missing
            )))
        }
    }
}

pub struct Summary {
    pub header: StreamHeader,
    pub units: usize,
    pub mean_degree: f64,
    /// Degree to number of units with that degree.
    pub histogram: BTreeMap<usize, usize>,
}

pub fn inspect_file(input: &Path) -> anyhow::Result<Summary> {
    let stream = stream::read(input)?;
    let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
    for unit in &stream.units {
        *histogram.entry(unit.degree()).or_default() += 1;
    }
    let edges: usize = stream.units.iter().map(|u| u.degree()).sum();
    let mean_degree = edges as f64 / stream.units.len().max(1) as f64;
    Ok(Summary { header: stream.header, units: stream.units.len(), mean_degree, histogram })
}
