//! Byte layout of encoding units and of the stream header that carries the
//! shared precode parameters. All integers are big-endian.
//!
//! Unit: `id: u32 | degree: u16 | neighbors: degree x u32 | value: symbol_len bytes`

use alloc::vec::Vec;

use crate::{ConfigFault, EncodingUnit, FountResult, Symbol, WireFault};

/// "FNT1"
pub const FOUNT_MAGIC: u32 = 0x464E_5431;
pub const WIRE_VERSION: u8 = 1;

/// Largest `k + p` a stream header may announce. Decoders size their
/// working state from the header, so this bounds what a stream can make
/// them allocate.
pub const MAX_INTERMEDIATE: usize = 1 << 20;

const UNIT_PREFIX: usize = 6;

fn take<const N: usize>(buf: &[u8], at: usize) -> FountResult<[u8; N]> {
    buf.get(at..at + N)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| WireFault::Truncated { needed: at + N, got: buf.len() }.into())
}

impl EncodingUnit {
    pub fn encoded_len(&self) -> usize {
        UNIT_PREFIX + 4 * self.degree() + self.value().len()
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.reserve(self.encoded_len());
        out.extend_from_slice(&self.id().to_be_bytes());
        // Degree fits: the constructor caps it at u16::MAX.
        out.extend_from_slice(&(self.degree() as u16).to_be_bytes());
        for &n in self.neighbors() {
            out.extend_from_slice(&n.to_be_bytes());
        }
        out.extend_from_slice(self.value().as_bytes());
    }

    /// Parses one unit from the front of `buf`. Returns the unit and the
    /// number of bytes consumed.
    pub fn read_from(buf: &[u8], symbol_len: usize) -> FountResult<(Self, usize)> {
        let id = u32::from_be_bytes(take::<4>(buf, 0)?);
        let degree = u16::from_be_bytes(take::<2>(buf, 4)?) as usize;

        let total = UNIT_PREFIX + 4 * degree + symbol_len;
        if buf.len() < total {
            return Err(WireFault::Truncated { needed: total, got: buf.len() }.into());
        }

        let mut neighbors = Vec::with_capacity(degree);
        for i in 0..degree {
            neighbors.push(u32::from_be_bytes(take::<4>(buf, UNIT_PREFIX + 4 * i)?));
        }
        let start = UNIT_PREFIX + 4 * degree;
        let value = Symbol::from(&buf[start..start + symbol_len]);

        // Degree, duplicates and empty values are rejected by the constructor.
        let unit = EncodingUnit::new(id, neighbors, value)?;
        Ok((unit, total))
    }
}

/// Written once at the head of a unit stream so the receiver can rebuild
/// the same precode graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub k: u32,
    pub p: u32,
    pub symbol_len: u32,
    pub min_degree: u16,
    pub max_degree: u16,
    pub seed: u64,
    pub count: u32,
}

impl StreamHeader {
    pub const SIZE: usize = 36;

    pub fn to_bytes(&self, buf: &mut [u8]) -> FountResult<()> {
        if buf.len() < Self::SIZE {
            return Err(WireFault::Truncated { needed: Self::SIZE, got: buf.len() }.into());
        }
        buf[0..4].copy_from_slice(&FOUNT_MAGIC.to_be_bytes());
        buf[4] = WIRE_VERSION;
        buf[5..8].fill(0);
        buf[8..12].copy_from_slice(&self.k.to_be_bytes());
        buf[12..16].copy_from_slice(&self.p.to_be_bytes());
        buf[16..20].copy_from_slice(&self.symbol_len.to_be_bytes());
        buf[20..22].copy_from_slice(&self.min_degree.to_be_bytes());
        buf[22..24].copy_from_slice(&self.max_degree.to_be_bytes());
        buf[24..32].copy_from_slice(&self.seed.to_be_bytes());
        buf[32..36].copy_from_slice(&self.count.to_be_bytes());
        Ok(())
    }

    pub fn from_bytes(buf: &[u8]) -> FountResult<Self> {
        if buf.len() < Self::SIZE {
            return Err(WireFault::Truncated { needed: Self::SIZE, got: buf.len() }.into());
        }
        let magic = u32::from_be_bytes(take::<4>(buf, 0)?);
        if magic != FOUNT_MAGIC {
            return Err(WireFault::BadMagic(magic).into());
        }
        if buf[4] != WIRE_VERSION {
            return Err(WireFault::UnsupportedVersion(buf[4]).into());
        }

        let header = Self {
            k: u32::from_be_bytes(take::<4>(buf, 8)?),
            p: u32::from_be_bytes(take::<4>(buf, 12)?),
            symbol_len: u32::from_be_bytes(take::<4>(buf, 16)?),
            min_degree: u16::from_be_bytes(take::<2>(buf, 20)?),
            max_degree: u16::from_be_bytes(take::<2>(buf, 22)?),
            seed: u64::from_be_bytes(take::<8>(buf, 24)?),
            count: u32::from_be_bytes(take::<4>(buf, 32)?),
        };
        header.validate()?;
        Ok(header)
    }

    /// Shape checks on the announced parameters: at least one source,
    /// non-empty symbols, and `k + p` within [`MAX_INTERMEDIATE`].
    pub fn validate(&self) -> FountResult<()> {
        if self.k == 0 {
            return Err(ConfigFault::NoSources.into());
        }
        if self.symbol_len == 0 {
            return Err(ConfigFault::EmptySymbol.into());
        }
        let n = (self.k as usize).saturating_add(self.p as usize);
        if n > MAX_INTERMEDIATE {
            return Err(ConfigFault::Overflow { field: "k + p", value: n }.into());
        }
        Ok(())
    }
}
