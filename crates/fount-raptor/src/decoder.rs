use log::{debug, info};
use zeroize::{Zeroize, Zeroizing};

use fount_core::{Decoded, EncodingUnit, FountResult, Shortfall, Slot, Symbol};
use fount_lt::{PeelState, PeelingDecoder};
use fount_math::{BinaryMatrix, BitRow};

use crate::CompositeCodec;

/// How a composite decode got where it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeReport {
    /// State of the first peeling run, before any repair.
    pub phase1: PeelState,
    /// Intermediate positions known after the first peeling run.
    pub phase1_resolved: usize,
    /// Positions filled by precode repair over all rounds.
    pub repaired: usize,
    /// Repair rounds run.
    pub rounds: usize,
}

impl CompositeCodec {
    pub fn decode(&self, units: &[EncodingUnit]) -> FountResult<Decoded> {
        self.decode_with_report(units).map(|(decoded, _)| decoded)
    }

    /// Phase 1 peels the intermediate domain. Phase 2 runs precode repair on
    /// what phase 1 left; repaired positions are seeded back into the peeling
    /// decoder, which may then peel further. Rounds alternate until one adds
    /// nothing or every source is known.
    pub fn decode_with_report(&self, units: &[EncodingUnit]) -> FountResult<(Decoded, BridgeReport)> {
        let k = self.k();
        let mut peel = PeelingDecoder::new(units, self.intermediate_len())?;

        let phase1 = peel.run();
        let mut report =
            BridgeReport { phase1, phase1_resolved: peel.resolved(), repaired: 0, rounds: 0 };

        while !peel.slots()[..k].iter().all(Slot::is_known) {
            report.rounds += 1;
            let mut slots = Zeroizing::new(peel.slots().to_vec());
            let repair = self.precode.repair(&mut slots[..])?;
            if repair.is_empty() {
                break;
            }
            report.repaired += repair.filled.len();
            for &at in &repair.filled {
                if let Slot::Known(value) = &slots[at as usize] {
                    peel.seed(at, value.clone())?;
                }
            }
            peel.run();
        }

        let decoded = Decoded::from_slots(peel.slots()[..k].to_vec(), Shortfall::Exhausted);
        if phase1 == PeelState::Stalled && decoded.is_recovered() {
            info!(
                "precode bridged a stall at {}/{} in {} rounds",
                report.phase1_resolved,
                self.intermediate_len(),
                report.rounds
            );
        }
        debug!("composite decode: {} of {} sources, {:?}", decoded.resolved(), k, report);
        Ok((decoded, report))
    }

    /// Exact decode over the intermediate domain: one row per received unit
    /// plus one zero-valued row per constraint (`parity ^ sources = 0`),
    /// solved by elimination.
    ///
    /// Only sources are returned, so a rank shortfall reports the pivot
    /// columns below `k` and their count. Parity pivots are dropped with the
    /// parity values.
    pub fn decode_exact(&self, units: &[EncodingUnit]) -> FountResult<Decoded> {
        let k = self.k();
        let n = self.intermediate_len();
        let Some(symbol_len) = units.first().map(|u| u.value().len()) else {
            return Ok(Decoded::from_slots(
                vec![Slot::Unknown; k],
                Shortfall::RankDeficient { rank: 0, pivots: Vec::new() },
            ));
        };

        let mut matrix = BinaryMatrix::new(n, symbol_len)?;
        for unit in units {
            matrix.push_unit(unit)?;
        }
        for (j, c) in self.precode.constraints().iter().enumerate() {
            let mut row = BitRow::from_indices(n, c.sources());
            row.set(k + j);
            matrix.push_row(row, Symbol::zeroed(symbol_len))?;
        }

        Ok(match matrix.reduce().into_decoded()? {
            Decoded::Recovered { mut sources } => {
                sources.iter_mut().skip(k).for_each(Zeroize::zeroize);
                sources.truncate(k);
                Decoded::Recovered { sources }
            }
            Decoded::Partial(partial) => {
                let cause = match partial.cause() {
                    Shortfall::RankDeficient { pivots, .. } => {
                        let pivots: Vec<usize> = pivots.iter().copied().filter(|&c| c < k).collect();
                        Shortfall::RankDeficient { rank: pivots.len(), pivots }
                    }
                    other => other.clone(),
                };
                Decoded::from_prefix(partial.into_slots(), k, cause)
            }
        })
    }
}
