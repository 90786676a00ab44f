use alloc::vec::Vec;
use zeroize::Zeroize;

const WORD: usize = 64;

/// A row vector over GF(2), packed 64 coefficients per word.
/// Addition is XOR; bits past `len` are always zero.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub struct BitRow {
    len: usize,
    words: Vec<u64>,
}

impl BitRow {
    pub fn zeros(len: usize) -> Self {
        Self { len, words: alloc::vec![0u64; len.div_ceil(WORD)] }
    }

    /// Row with a 1 in every listed column. Out-of-range columns are ignored;
    /// callers range-check first.
    pub fn from_indices(len: usize, indices: &[u32]) -> Self {
        let mut row = Self::zeros(len);
        for &i in indices {
            row.set(i as usize);
        }
        row
    }

    /// Row from a dense 0/1 slice (any nonzero byte counts as 1).
    pub fn from_dense(bits: &[u8]) -> Self {
        let mut row = Self::zeros(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            if b != 0 {
                row.set(i);
            }
        }
        row
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, col: usize) -> bool {
        col < self.len && (self.words[col / WORD] >> (col % WORD)) & 1 == 1
    }

    #[inline]
    pub fn set(&mut self, col: usize) {
        if col < self.len {
            self.words[col / WORD] |= 1u64 << (col % WORD);
        }
    }

    /// Row addition in GF(2).
    #[inline]
    pub fn xor_assign(&mut self, other: &BitRow) {
        debug_assert_eq!(self.len, other.len);
        for (d, s) in self.words.iter_mut().zip(other.words.iter()) {
            *d ^= *s;
        }
    }

    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Columns holding a 1, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &w)| {
            let mut rest = w;
            core::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(wi * WORD + bit)
            })
        })
    }
}
