//! Buffer for holding significand words.

use crate::defs::Error;
use crate::defs::Word;
use crate::defs::WORD_BIT_SIZE;
use core::ops::Deref;
use core::ops::DerefMut;
use core::ops::Index;
use core::ops::IndexMut;
use core::slice::SliceIndex;
use smallvec::SmallVec;

const STATIC_ALLOCATION: usize = 2;

/// Buffer for holding significand words.
/// The least significant word has index 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordBuf {
    inner: SmallVec<[Word; STATIC_ALLOCATION]>,
}

impl WordBuf {
    /// Allocates a buffer of `sz` zero words.
    #[inline]
    pub fn new(sz: usize) -> Result<Self, Error> {
        let mut inner = SmallVec::new();
        inner.try_reserve_exact(sz)?;
        inner.resize(sz, 0);
        Ok(WordBuf { inner })
    }

    /// Allocates a buffer large enough to hold `p` bits.
    #[inline]
    pub fn with_bits(p: usize) -> Result<Self, Error> {
        Self::new(words_for_bits(p))
    }

    /// A buffer of a single word. Never allocates.
    pub fn from_word(w: Word) -> Self {
        let mut inner = SmallVec::new();
        inner.push(w);
        WordBuf { inner }
    }

    #[inline]
    pub fn fill(&mut self, d: Word) {
        self.inner.fill(d);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Number of words needed to hold `p` bits.
#[inline]
pub fn words_for_bits(p: usize) -> usize {
    (p + WORD_BIT_SIZE - 1) / WORD_BIT_SIZE
}

impl<I: SliceIndex<[Word]>> IndexMut<I> for WordBuf {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        self.inner.index_mut(index)
    }
}

impl<I: SliceIndex<[Word]>> Index<I> for WordBuf {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        self.inner.index(index)
    }
}

impl Deref for WordBuf {
    type Target = [Word];

    #[inline]
    fn deref(&self) -> &[Word] {
        self.inner.deref()
    }
}

impl DerefMut for WordBuf {
    #[inline]
    fn deref_mut(&mut self) -> &mut [Word] {
        self.inner.deref_mut()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_word_buf() {
        let mut wb = WordBuf::from_word(7);
        assert_eq!(&wb[..], &[7]);
        wb.fill(1);
        assert_eq!(wb.len(), 1);
        assert_eq!(wb[0], 1);

        let wb = WordBuf::with_bits(129).unwrap();
        assert_eq!(wb.len(), 3);
        assert!(wb.iter().all(|w| *w == 0));
        assert_eq!(words_for_bits(1), 1);
        assert_eq!(words_for_bits(64), 1);
        assert_eq!(words_for_bits(65), 2);
    }
}
