use log::{debug, trace};

use fount_core::{ConfigFault, Decoded, FountResult, Shortfall, Slot, Symbol};

use crate::Precode;

/// What one [`Precode::repair`] call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Full passes over the constraints, including the last idle one.
    pub passes: usize,
    /// Intermediate positions filled, in fill order.
    pub filled: Vec<u32>,
}

impl RepairReport {
    pub fn is_empty(&self) -> bool {
        self.filled.is_empty()
    }
}

impl Precode {
    /// Constraint propagation over an intermediate slot vector (`k + p`
    /// long), in place, until a full pass changes nothing or `max_passes` is
    /// reached.
    ///
    /// A constraint with a known parity and exactly one unknown source fills
    /// that source. A constraint with an unknown parity and every source known
    /// fills the parity. Nothing else is ever written.
    pub fn repair(&self, slots: &mut [Slot]) -> FountResult<RepairReport> {
        let expected = self.intermediate_len();
        if slots.len() != expected {
            return Err(ConfigFault::LengthMismatch { expected, got: slots.len() }.into());
        }
        let mut report = RepairReport::default();
        let Some(symbol_len) = known_len(slots)? else {
            return Ok(report);
        };

        while report.passes < self.max_passes {
            report.passes += 1;
            let mut progress = false;

            for (j, constraint) in self.constraints.iter().enumerate() {
                let parity_at = self.k + j;
                let mut unknown = constraint.sources().iter().filter(|&&s| !slots[s as usize].is_known());
                let first = unknown.next().copied();
                let more = unknown.next().is_some();

                let target = match (slots[parity_at].is_known(), first, more) {
                    (true, Some(source), false) => source as usize,
                    (false, None, _) => parity_at,
                    _ => continue,
                };

                // Every other member of the constraint is known; their XOR is the target.
                let mut value = Symbol::zeroed(symbol_len);
                for &s in constraint.sources() {
                    if let Slot::Known(v) = &slots[s as usize] {
                        value.xor_assign(v);
                    }
                }
                if let Slot::Known(v) = &slots[parity_at] {
                    value.xor_assign(v);
                }

                trace!("constraint {} fills position {}", j, target);
                slots[target] = Slot::Known(value);
                report.filled.push(target as u32);
                progress = true;
            }

            if !progress {
                break;
            }
        }

        debug!("precode repair filled {} positions in {} passes", report.filled.len(), report.passes);
        Ok(report)
    }

    /// Repairs a copy of `received` and returns the source half. Unknown
    /// sources stay unknown and are listed in the partial result. The
    /// parity half of the copy is wiped.
    pub fn decode(&self, received: &[Slot]) -> FountResult<Decoded> {
        let mut slots = received.to_vec();
        self.repair(&mut slots)?;
        Ok(Decoded::from_prefix(slots, self.k, Shortfall::Exhausted))
    }
}

/// Common length of the known slots, `None` if there are none.
fn known_len(slots: &[Slot]) -> FountResult<Option<usize>> {
    let mut len = None;
    for v in slots.iter().filter_map(Slot::as_known) {
        match len {
            None => len = Some(v.len()),
            Some(expected) if expected != v.len() => {
                return Err(ConfigFault::SymbolLength { expected, got: v.len() }.into());
            }
            Some(_) => {}
        }
    }
    Ok(len)
}
