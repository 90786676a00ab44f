use std::path::Path;

use anyhow::Context;
use log::warn;

use fount_core::{EncodingUnit, StreamHeader};

/// A parsed stream file: header plus every unit that followed it.
pub struct UnitStream {
    pub header: StreamHeader,
    pub units: Vec<EncodingUnit>,
}

pub fn write(path: &Path, header: &StreamHeader, units: &[EncodingUnit]) -> anyhow::Result<()> {
    let mut buf = vec![0u8; StreamHeader::SIZE];
    header.to_bytes(&mut buf)?;
    for unit in units {
        unit.write_to(&mut buf);
    }
    std::fs::write(path, &buf).with_context(|| format!("writing {}", path.display()))
}

pub fn read(path: &Path) -> anyhow::Result<UnitStream> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let header = StreamHeader::from_bytes(&bytes).context("stream header")?;
    let symbol_len = header.symbol_len as usize;

    let mut units = Vec::new();
    let mut at = StreamHeader::SIZE;
    while at < bytes.len() {
        let (unit, used) = EncodingUnit::read_from(&bytes[at..], symbol_len)
            .with_context(|| format!("unit {} at byte {}", units.len(), at))?;
        units.push(unit);
        at += used;
    }

    if units.len() != header.count as usize {
        warn!("header announces {} units, stream holds {}", header.count, units.len());
    }
    Ok(UnitStream { header, units })
}
