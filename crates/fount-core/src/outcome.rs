use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use zeroize::Zeroize;

use crate::{FountError, FountResult, Slot, Symbol};

/// Why a decode finished with positions still unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortfall {
    /// Belief propagation: the ripple emptied.
    Stalled,
    /// Constraint repair: a full pass made no progress.
    Exhausted,
    /// Exact solver: rank below the number of unknowns.
    RankDeficient { rank: usize, pivots: Vec<usize> },
}

/// A decode that did not determine every position. Known slots are exact;
/// unknown slots are never filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    slots: Vec<Slot>,
    cause: Shortfall,
}

impl Partial {
    pub fn new(slots: Vec<Slot>, cause: Shortfall) -> Self {
        Self { slots, cause }
    }

    pub fn resolved(&self) -> usize {
        self.slots.iter().filter(|s| s.is_known()).count()
    }

    pub fn unresolved(&self) -> BTreeSet<u32> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_known())
            .map(|(i, _)| i as u32)
            .collect()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<Slot> {
        self.slots
    }

    pub fn cause(&self) -> &Shortfall {
        &self.cause
    }

    pub fn into_error(self) -> FountError {
        let resolved = self.resolved();
        let unresolved = self.slots.len() - resolved;
        match self.cause {
            Shortfall::Stalled => FountError::DecodeStalled { resolved, unresolved },
            Shortfall::Exhausted => FountError::PrecodeExhausted { resolved, unresolved },
            Shortfall::RankDeficient { rank, pivots } => FountError::RankDeficient { rank, pivots },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Recovered { sources: Vec<Symbol> },
    Partial(Partial),
}

impl Decoded {
    /// `Recovered` when every slot is known, otherwise `Partial` with `cause`.
    pub fn from_slots(slots: Vec<Slot>, cause: Shortfall) -> Self {
        if slots.iter().all(Slot::is_known) {
            let sources = slots
                .into_iter()
                .filter_map(|s| match s {
                    Slot::Known(value) => Some(value),
                    Slot::Unknown => None,
                })
                .collect();
            Decoded::Recovered { sources }
        } else {
            Decoded::Partial(Partial::new(slots, cause))
        }
    }

    /// [`Decoded::from_slots`] over the first `len` slots. The slots past
    /// `len` are wiped before they are dropped.
    pub fn from_prefix(mut slots: Vec<Slot>, len: usize, cause: Shortfall) -> Self {
        slots.iter_mut().skip(len).for_each(Zeroize::zeroize);
        slots.truncate(len);
        Self::from_slots(slots, cause)
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, Decoded::Recovered { .. })
    }

    pub fn sources(&self) -> Option<&[Symbol]> {
        match self {
            Decoded::Recovered { sources } => Some(sources),
            Decoded::Partial(_) => None,
        }
    }

    pub fn resolved(&self) -> usize {
        match self {
            Decoded::Recovered { sources } => sources.len(),
            Decoded::Partial(partial) => partial.resolved(),
        }
    }

    pub fn unresolved(&self) -> BTreeSet<u32> {
        match self {
            Decoded::Recovered { .. } => BTreeSet::new(),
            Decoded::Partial(partial) => partial.unresolved(),
        }
    }

    /// The recovered sources, or the layer's structured failure.
    pub fn into_sources(self) -> FountResult<Vec<Symbol>> {
        match self {
            Decoded::Recovered { sources } => Ok(sources),
            Decoded::Partial(partial) => Err(partial.into_error()),
        }
    }
}
