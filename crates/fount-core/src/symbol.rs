use alloc::vec::Vec;
use zeroize::Zeroize;

use crate::{ConfigFault, FountResult};

/// A fixed-length byte buffer. The unit of XOR combination.
#[derive(Clone, PartialEq, Eq, Hash, Default, Zeroize)]
pub struct Symbol(Vec<u8>);

impl Symbol {
    pub fn zeroed(len: usize) -> Self {
        Self(alloc::vec![0u8; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// `self ^= other`. Both sides must have the same length; callers
    /// validate lengths at the API boundary.
    #[inline]
    pub fn xor_assign(&mut self, other: &Symbol) {
        debug_assert_eq!(self.0.len(), other.0.len());
        for (d, s) in self.0.iter_mut().zip(other.0.iter()) {
            *d ^= *s;
        }
    }
}

impl From<Vec<u8>> for Symbol {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Symbol {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Symbol {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl core::ops::BitXorAssign<&Symbol> for Symbol {
    fn bitxor_assign(&mut self, rhs: &Symbol) {
        self.xor_assign(rhs);
    }
}

impl core::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Symbol[")?;
        for (i, b) in self.0.iter().take(8).enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}", b)?;
        }
        if self.0.len() > 8 {
            write!(f, " ..{}B", self.0.len())?;
        }
        write!(f, "]")
    }
}

/// One position of a decode vector. Unknown never carries a placeholder value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Known(Symbol),
    Unknown,
}

impl Slot {
    pub fn is_known(&self) -> bool {
        matches!(self, Slot::Known(_))
    }

    pub fn as_known(&self) -> Option<&Symbol> {
        match self {
            Slot::Known(value) => Some(value),
            Slot::Unknown => None,
        }
    }
}

impl Zeroize for Slot {
    /// Wipes a known value and leaves the slot unknown.
    fn zeroize(&mut self) {
        if let Slot::Known(value) = self {
            value.zeroize();
        }
        *self = Slot::Unknown;
    }
}

impl From<Option<Symbol>> for Slot {
    fn from(value: Option<Symbol>) -> Self {
        value.map_or(Slot::Unknown, Slot::Known)
    }
}

/// Checks that `symbols` is non-empty and every entry has the same non-zero
/// length. Returns that length.
pub fn uniform_len(symbols: &[Symbol]) -> FountResult<usize> {
    let first = symbols.first().ok_or(ConfigFault::NoSources)?;
    let len = first.len();
    if len == 0 {
        return Err(ConfigFault::EmptySymbol.into());
    }
    for s in symbols {
        if s.len() != len {
            return Err(ConfigFault::SymbolLength { expected: len, got: s.len() }.into());
        }
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FountError;
    use alloc::vec;

    #[test]
    fn xor_is_self_inverse() {
        let a = Symbol::from(vec![0x41, 0x42, 0xFF]);
        let b = Symbol::from(vec![0x0F, 0xF0, 0xFF]);
        let mut c = a.clone();
        c ^= &b;
        assert_eq!(c.as_bytes(), &[0x4E, 0xB2, 0x00]);
        c ^= &b;
        assert_eq!(c, a);
    }

    #[test]
    fn uniform_len_rejects_ragged_input() {
        let symbols = vec![Symbol::zeroed(4), Symbol::zeroed(3)];
        assert_eq!(
            uniform_len(&symbols),
            Err(FountError::InvalidConfig(ConfigFault::SymbolLength { expected: 4, got: 3 }))
        );
        assert_eq!(
            uniform_len(&[Symbol::zeroed(0)]),
            Err(FountError::InvalidConfig(ConfigFault::EmptySymbol))
        );
        assert_eq!(uniform_len(&[]), Err(FountError::InvalidConfig(ConfigFault::NoSources)));
    }

    #[test]
    fn zeroized_slot_forgets_its_value() {
        let mut slot = Slot::Known(Symbol::from(vec![0xDE, 0xAD]));
        slot.zeroize();
        assert_eq!(slot, Slot::Unknown);

        let mut unknown = Slot::Unknown;
        unknown.zeroize();
        assert!(!unknown.is_known());
    }
}
