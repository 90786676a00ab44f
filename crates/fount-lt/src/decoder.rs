//! Belief-propagation ("peeling") decoder.
//!
//! Each received unit gets a private working copy. A reverse index maps every
//! source position to the units that reference it, and the ripple is a
//! min-heap of degree-one units keyed by `(id, position)`, so each resolved
//! symbol touches only the units adjacent to it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::mem;

use log::{debug, trace, warn};
use zeroize::Zeroize;

use fount_core::{ConfigFault, Decoded, EncodingUnit, FountResult, Shortfall, Slot, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeelState {
    Init,
    Resolving,
    Done,
    Stalled,
}

#[derive(Zeroize)]
struct WorkingUnit {
    id: u32,
    value: Symbol,
    neighbors: Vec<u32>,
}

pub struct PeelingDecoder {
    k: usize,
    symbol_len: usize,
    units: Vec<WorkingUnit>,
    index: Vec<Vec<usize>>,
    slots: Vec<Slot>,
    resolved: usize,
    ripple: BinaryHeap<Reverse<(u32, usize)>>,
    state: PeelState,
    iterations: usize,
    peak_ripple: usize,
}

impl PeelingDecoder {
    pub fn new(units: &[EncodingUnit], k: usize) -> FountResult<Self> {
        if k == 0 {
            return Err(ConfigFault::NoSources.into());
        }
        let symbol_len = units.first().map_or(0, |u| u.value().len());

        let mut working = Vec::with_capacity(units.len());
        let mut index = vec![Vec::new(); k];
        let mut ripple = BinaryHeap::new();
        for (pos, unit) in units.iter().enumerate() {
            unit.check(k, symbol_len)?;
            for &n in unit.neighbors() {
                index[n as usize].push(pos);
            }
            if unit.degree() == 1 {
                ripple.push(Reverse((unit.id(), pos)));
            }
            working.push(WorkingUnit {
                id: unit.id(),
                value: unit.value().clone(),
                neighbors: unit.neighbors().to_vec(),
            });
        }

        let peak_ripple = ripple.len();
        Ok(Self {
            k,
            symbol_len,
            units: working,
            index,
            slots: vec![Slot::Unknown; k],
            resolved: 0,
            ripple,
            state: PeelState::Init,
            iterations: 0,
            peak_ripple,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn state(&self) -> PeelState {
        self.state
    }

    pub fn resolved(&self) -> usize {
        self.resolved
    }

    /// Ripple members consumed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn peak_ripple(&self) -> usize {
        self.peak_ripple
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Supplies a value learned outside this decoder (for example from
    /// precode repair). Returns `false` if the position was already known.
    /// A stalled decoder becomes runnable again if this refills the ripple.
    pub fn seed(&mut self, index: u32, value: Symbol) -> FountResult<bool> {
        let at = index as usize;
        if at >= self.k {
            return Err(ConfigFault::IndexOutOfRange { index, k: self.k }.into());
        }
        if self.symbol_len == 0 {
            self.symbol_len = value.len();
        }
        if value.len() != self.symbol_len {
            return Err(ConfigFault::SymbolLength { expected: self.symbol_len, got: value.len() }
                .into());
        }
        if self.slots[at].is_known() {
            return Ok(false);
        }

        self.assign(index, value);
        if self.resolved == self.k {
            self.state = PeelState::Done;
        } else if self.state == PeelState::Stalled && !self.ripple.is_empty() {
            self.state = PeelState::Resolving;
        }
        Ok(true)
    }

    /// Peels until every position is known or the ripple runs dry.
    pub fn run(&mut self) -> PeelState {
        if self.state == PeelState::Init {
            self.state = PeelState::Resolving;
        }

        loop {
            if self.resolved == self.k {
                self.state = PeelState::Done;
                break;
            }
            let Some(Reverse((id, pos))) = self.ripple.pop() else {
                self.state = PeelState::Stalled;
                break;
            };
            // Stale entry: the unit lost its last neighbor after being queued.
            if self.units[pos].neighbors.len() != 1 {
                continue;
            }

            self.iterations += 1;
            let unit = &mut self.units[pos];
            let target = unit.neighbors[0];
            unit.neighbors.clear();
            let value = mem::take(&mut unit.value);
            trace!("unit {} resolves index {}", id, target);
            self.assign(target, value);
        }

        debug!(
            "peeling {:?}: {}/{} resolved in {} iterations, peak ripple {}",
            self.state, self.resolved, self.k, self.iterations, self.peak_ripple
        );
        self.state
    }

    pub fn into_decoded(mut self) -> Decoded {
        let slots = mem::take(&mut self.slots);
        Decoded::from_slots(slots, Shortfall::Stalled)
    }

    /// Records `value` at `target` and XORs it out of every unit still
    /// listing `target`.
    fn assign(&mut self, target: u32, value: Symbol) {
        let adjacent = mem::take(&mut self.index[target as usize]);
        for pos in adjacent {
            let unit = &mut self.units[pos];
            let Some(at) = unit.neighbors.iter().position(|&n| n == target) else {
                continue;
            };
            unit.neighbors.swap_remove(at);
            unit.value.xor_assign(&value);
            match unit.neighbors.len() {
                1 => self.ripple.push(Reverse((unit.id, pos))),
                0 if !unit.value.is_zero() => {
                    warn!("unit {} disagrees with resolved symbols", unit.id);
                }
                _ => {}
            }
        }
        self.peak_ripple = self.peak_ripple.max(self.ripple.len());
        self.slots[target as usize] = Slot::Known(value);
        self.resolved += 1;
    }
}

impl Drop for PeelingDecoder {
    fn drop(&mut self) {
        for unit in &mut self.units {
            unit.zeroize();
        }
    }
}
