//! Auxiliary functions: word-level arithmetic on little-endian word slices.

use core::cmp::Ordering;

use itertools::izip;
use num_bigint::BigUint;

use crate::defs::{Word, WORD_BIT_SIZE, WORD_MAX, WORD_SIGNIFICANT_BIT};

/// Ceiling of the base 2 logarithm of `n`; 0 for `n` <= 1.
pub fn log2_ceil(n: u64) -> u64 {
    if n <= 1 {
        0
    } else {
        (WORD_BIT_SIZE as u32 - (n - 1).leading_zeros()) as u64
    }
}

/// Floor of the base 2 logarithm of `n`; 0 for `n` <= 1.
pub fn log2_floor(n: u64) -> u64 {
    if n <= 1 {
        0
    } else {
        (WORD_BIT_SIZE as u32 - 1 - n.leading_zeros()) as u64
    }
}

#[inline(always)]
pub fn add_carry(a: Word, b: Word, c: Word, r: &mut Word) -> Word {
    #[cfg(target_arch = "x86_64")]
    {
        // platform-specific operation
        unsafe { core::arch::x86_64::_addcarry_u64(c as u8, a, b, r) as Word }
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        use crate::defs::DoubleWord;
        use crate::defs::WORD_BASE;

        let mut s = c as DoubleWord + a as DoubleWord + b as DoubleWord;
        if s >= WORD_BASE {
            s -= WORD_BASE;
            *r = s as Word;
            1
        } else {
            *r = s as Word;
            0
        }
    }
}

#[inline(always)]
pub fn sub_borrow(a: Word, b: Word, c: Word, r: &mut Word) -> Word {
    #[cfg(target_arch = "x86_64")]
    {
        // platform-specific operation
        unsafe { core::arch::x86_64::_subborrow_u64(c as u8, a, b, r) as Word }
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        use crate::defs::DoubleWord;
        use crate::defs::WORD_BASE;

        let v1 = a as DoubleWord;
        let v2 = b as DoubleWord + c as DoubleWord;

        if v1 < v2 {
            *r = (v1 + WORD_BASE - v2) as Word;
            1
        } else {
            *r = (v1 - v2) as Word;
            0
        }
    }
}

/// `r -= b` for slices of equal length; returns the borrow.
pub fn sub_n(r: &mut [Word], b: &[Word]) -> Word {
    debug_assert_eq!(r.len(), b.len());
    let mut c = 0;
    for (d, &s) in izip!(r.iter_mut(), b.iter()) {
        c = sub_borrow(*d, s, c, d);
    }
    c
}

/// `r += w`; returns the carry out of the most significant word.
pub fn add_1(r: &mut [Word], w: Word) -> Word {
    let mut c = w;
    for d in r.iter_mut() {
        if c == 0 {
            break;
        }
        c = add_carry(*d, c, 0, d);
    }
    c
}

/// `r -= w`; returns the borrow out of the most significant word.
pub fn sub_1(r: &mut [Word], w: Word) -> Word {
    let mut c = w;
    for d in r.iter_mut() {
        if c == 0 {
            break;
        }
        c = sub_borrow(*d, c, 0, d);
    }
    c
}

/// `r = src >> sh` for 0 < `sh` < word size; returns the bits shifted out,
/// placed in the most significant part of the returned word.
pub fn rshift(r: &mut [Word], src: &[Word], sh: usize) -> Word {
    debug_assert!(sh > 0 && sh < WORD_BIT_SIZE);
    debug_assert_eq!(r.len(), src.len());
    let out = src[0] << (WORD_BIT_SIZE - sh);
    let l = src.len();
    for i in 0..l - 1 {
        r[i] = (src[i] >> sh) | (src[i + 1] << (WORD_BIT_SIZE - sh));
    }
    r[l - 1] = src[l - 1] >> sh;
    out
}

/// Compares two msb-aligned significands of possibly different length,
/// the shorter one padded with zero words at the bottom.
pub fn cmp_aligned(a: &[Word], b: &[Word]) -> Ordering {
    let mut ia = a.iter().rev();
    let mut ib = b.iter().rev();
    loop {
        match (ia.next(), ib.next()) {
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(y);
                }
            }
            (Some(x), None) => {
                if *x != 0 || ia.any(|v| *v != 0) {
                    return Ordering::Greater;
                }
                return Ordering::Equal;
            }
            (None, Some(y)) => {
                if *y != 0 || ib.any(|v| *v != 0) {
                    return Ordering::Less;
                }
                return Ordering::Equal;
            }
            (None, None) => return Ordering::Equal,
        }
    }
}

#[inline]
pub fn is_all_zero(a: &[Word]) -> bool {
    a.iter().all(|v| *v == 0)
}

/// Mask with `n` least significant bits set.
#[inline]
pub fn low_mask(n: usize) -> Word {
    if n >= WORD_BIT_SIZE {
        WORD_MAX
    } else {
        (1 << n) - 1
    }
}

/// Returns true if the significand is 100..0.
pub fn is_power_of_two(m: &[Word]) -> bool {
    let l = m.len();
    m[l - 1] == WORD_SIGNIFICANT_BIT && is_all_zero(&m[..l - 1])
}

/// Number of bits from the most significant bit of the significand to the last non-zero bit inclusive.
pub fn significant_bits(m: &[Word]) -> usize {
    for (i, &w) in m.iter().enumerate() {
        if w != 0 {
            return (m.len() - i) * WORD_BIT_SIZE - w.trailing_zeros() as usize;
        }
    }
    0
}

/// Converts little-endian words to an integer.
pub fn words_to_biguint(w: &[Word]) -> BigUint {
    let mut digits = Vec::with_capacity(w.len() * 2);
    for &v in w {
        digits.push(v as u32);
        digits.push((v >> 32) as u32);
    }
    BigUint::new(digits)
}

/// Places the integer `n` > 0 into `nw` words msb-aligned, discarding bits which do not fit.
/// Returns the words and the number of significant bits of `n`, and
/// whether non-zero bits were discarded.
pub fn biguint_to_aligned_words(n: &BigUint, nw: usize) -> (Vec<Word>, u64, bool) {
    let bits = n.bits();
    let total = (nw * WORD_BIT_SIZE) as u64;
    let (v, lost) = if bits > total {
        let sh = bits - total;
        let lost = n.trailing_zeros().map_or(false, |tz| tz < sh);
        (n >> sh, lost)
    } else {
        (n << (total - bits), false)
    };
    let mut w = v.to_u64_digits();
    w.resize(nw, 0);
    (w, bits, lost)
}

#[cfg(test)]
#[inline]
pub fn rand_p() -> usize {
    rand::random::<usize>() % 300 + 1
}

#[cfg(test)]
mod tests {

    use super::*;
    use rand::random;

    #[test]
    fn test_log2() {
        assert_eq!(log2_ceil(1), 0);
        assert_eq!(log2_ceil(2), 1);
        assert_eq!(log2_ceil(3), 2);
        assert_eq!(log2_ceil(1024), 10);
        assert_eq!(log2_ceil(1025), 11);
        assert_eq!(log2_floor(1025), 10);
        assert_eq!(log2_floor(1), 0);
    }

    #[test]
    fn test_add_sub() {
        for _ in 0..1000 {
            let a = [random::<Word>(), random::<Word>() | WORD_SIGNIFICANT_BIT];
            let b = [random::<Word>(), random::<Word>() >> 1];
            let mut r = a;
            assert_eq!(sub_n(&mut r, &b), 0);
            assert_eq!(words_to_biguint(&r), words_to_biguint(&a) - words_to_biguint(&b));

            let mut r = b;
            assert_eq!(sub_n(&mut r, &a), 1);
        }

        let mut r = [WORD_MAX, WORD_MAX];
        assert_eq!(add_1(&mut r, 1), 1);
        assert_eq!(r, [0, 0]);
        assert_eq!(sub_1(&mut r, 1), 1);
        assert_eq!(r, [WORD_MAX, WORD_MAX]);
    }

    #[test]
    fn test_shifts() {
        let src = [0x8000000000000001u64, 0x1];
        let mut r = [0; 2];
        let out = rshift(&mut r, &src, 1);
        assert_eq!(out, WORD_SIGNIFICANT_BIT);
        assert_eq!(r, [0xC000000000000000, 0]);

        for _ in 0..100 {
            let a = [random::<Word>(), random::<Word>(), random::<Word>()];
            let sh = random::<usize>() % (WORD_BIT_SIZE - 1) + 1;
            let mut r = [0; 3];
            let out = rshift(&mut r, &a, sh);
            assert_eq!(words_to_biguint(&r), words_to_biguint(&a) >> sh);
            assert_eq!(out >> (WORD_BIT_SIZE - sh), a[0] & low_mask(sh));
        }
    }

    #[test]
    fn test_compare() {
        assert_eq!(cmp_aligned(&[0, 5], &[5]), Ordering::Equal);
        assert_eq!(cmp_aligned(&[1, 5], &[5]), Ordering::Greater);
        assert_eq!(cmp_aligned(&[6], &[1, 5]), Ordering::Greater);
        assert_eq!(cmp_aligned(&[5], &[1, 5]), Ordering::Less);
        assert!(is_power_of_two(&[0, WORD_SIGNIFICANT_BIT]));
        assert!(!is_power_of_two(&[1, WORD_SIGNIFICANT_BIT]));
        assert_eq!(significant_bits(&[0, WORD_SIGNIFICANT_BIT]), 1);
        assert_eq!(significant_bits(&[1, WORD_SIGNIFICANT_BIT]), 128);
        assert_eq!(low_mask(3), 7);
    }

    #[test]
    fn test_biguint_conversion() {
        let n = BigUint::from(0b1011u32);
        let (w, bits, lost) = biguint_to_aligned_words(&n, 1);
        assert_eq!(bits, 4);
        assert!(!lost);
        assert_eq!(w, vec![0b1011 << 60]);

        let n = words_to_biguint(&[1, 1, 1]);
        let (w, bits, lost) = biguint_to_aligned_words(&n, 1);
        assert_eq!(bits, 129);
        assert!(lost);
        assert_eq!(w, vec![WORD_SIGNIFICANT_BIT]);
    }
}
