//! Rounding of significands and the rounding decision used by iterative refinement.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::common::util::{add_1, is_all_zero, low_mask, words_to_biguint};
use crate::defs::{Exponent, RoundingMode, Sign, Word, WORD_BIT_SIZE, WORD_SIGNIFICANT_BIT};
use crate::num::BigFloat;

/// Rounds the msb-normalized significand `src` to `dp` bits and stores the result in `dst`.
/// All bits of `dst` below the first `dp` bits are cleared.
///
/// If `sticky` is true, the exact magnitude is slightly greater than `src`, but the difference is
/// less than a half of the last bit of `src`.
///
/// Returns the ternary value in magnitude (negative if the result is smaller in magnitude than the exact value),
/// which is 2 or -2 if the exact value was halfway between two representable values,
/// and whether the rounding carried into a new most significant bit.
/// In the latter case `dst` is set to 100..0, and the caller must increment the exponent.
pub(crate) fn round_raw(
    dst: &mut [Word],
    dp: usize,
    src: &[Word],
    sticky: bool,
    s: Sign,
    rm: RoundingMode,
) -> (i32, bool) {
    let dl = dst.len();
    let sl = src.len();
    debug_assert!(dp >= 1 && dp <= dl * WORD_BIT_SIZE);

    let n = dl.min(sl);
    dst[dl - n..].copy_from_slice(&src[sl - n..]);
    dst[..dl - n].fill(0);
    let rest = &src[..sl - n];

    let sh = dl * WORD_BIT_SIZE - dp;
    let (rb, mut st) = if sh == 0 {
        match rest.split_last() {
            Some((&w, low)) => (
                w & WORD_SIGNIFICANT_BIT != 0,
                w & !WORD_SIGNIFICANT_BIT != 0 || !is_all_zero(low),
            ),
            None => (false, false),
        }
    } else {
        let pos = sh - 1;
        let (i, b) = (pos / WORD_BIT_SIZE, pos % WORD_BIT_SIZE);
        (
            (dst[i] >> b) & 1 == 1,
            dst[i] & low_mask(b) != 0 || !is_all_zero(&dst[..i]) || !is_all_zero(rest),
        )
    };
    st |= sticky;

    let (k, b) = (sh / WORD_BIT_SIZE, sh % WORD_BIT_SIZE);
    dst[..k].fill(0);
    dst[k] &= !low_mask(b);

    if !rb && !st {
        return (0, false);
    }

    let (away, tern) = match rm.to_magnitude(s) {
        RoundingMode::FromZero => (true, 1),
        RoundingMode::ToEven => {
            if !rb {
                (false, -1)
            } else if st {
                (true, 1)
            } else if (dst[k] >> b) & 1 == 1 {
                (true, 2)
            } else {
                (false, -2)
            }
        }
        _ => (false, -1),
    };

    if !away {
        return (tern, false);
    }

    if add_1(&mut dst[k..], 1 << b) != 0 {
        dst[dl - 1] = WORD_SIGNIFICANT_BIT;
        (tern, true)
    } else {
        (tern, false)
    }
}

/// Rounds the integer `v` to `prec` significant bits keeping its scale.
fn round_int(v: &BigUint, prec: usize, rm: RoundingMode) -> BigUint {
    let bits = v.bits() as usize;
    if bits <= prec {
        return v.clone();
    }
    let sh = bits - prec;
    let q = v >> sh;
    let r = v - (&q << sh);
    let up = match rm {
        RoundingMode::ToZero => false,
        RoundingMode::FromZero => !r.is_zero(),
        _ => {
            let half = BigUint::one() << (sh - 1);
            r > half || (r == half && q.bit(0))
        }
    };
    let q = if up { q + 1u32 } else { q };
    q << sh
}

/// Decides if an approximation can be rounded correctly.
///
/// `bp` is the msb-normalized significand of the approximation `b`, `s` its sign.
/// The exact value `x` satisfies `|x - b| <= 2^(EXP(b) - err)`, and lies on the side of `b`
/// given by `rnd1`: an approximation obtained by rounding toward zero is below `x` in magnitude,
/// an approximation obtained by rounding away from zero is above `x` in magnitude, and
/// `ToEven` or `Faithful` say nothing about the side.
///
/// Returns true if every value of the uncertainty interval rounds to the same number of `prec` bits
/// using the rounding mode `rnd2`. If `rnd2` is `Faithful`, returns true if a single number of
/// `prec` bits is a faithful rounding of every value of the interval.
/// The ternary value of the rounding is not determined.
pub fn can_round_raw(
    bp: &[Word],
    s: Sign,
    err: Exponent,
    rnd1: RoundingMode,
    rnd2: RoundingMode,
    prec: usize,
) -> bool {
    // below `prec` the interval always contains a rounding boundary; at `prec` it can be
    // decided only when it crosses a power of two
    if err <= 0 || (err as u64) < prec as u64 {
        return false;
    }

    let n = bp.len() * WORD_BIT_SIZE;

    // a larger error exponent does not change the decision
    let err = (err as u64).min((n.max(prec + 1) + 2) as u64) as usize;

    let k = err.max(n);
    let b = words_to_biguint(bp) << (k - n);
    let eps = BigUint::one() << (k - err);

    let (lo, hi) = match rnd1.to_magnitude(s) {
        RoundingMode::ToZero => (b.clone(), &b + &eps),
        RoundingMode::FromZero => (&b - &eps, b),
        _ => (&b - &eps, &b + &eps),
    };

    match rnd2.to_magnitude(s) {
        RoundingMode::Faithful => {
            round_int(&hi, prec, RoundingMode::ToZero) <= round_int(&lo, prec, RoundingMode::FromZero)
        }
        rm => round_int(&lo, prec, rm) == round_int(&hi, prec, rm),
    }
}

/// Fast check used by iterative refinement: returns true if the bits of `bp` from position `prec + 1`
/// to position `err` counting from the most significant bit are neither all zeros nor all ones.
///
/// The result equals `can_round_raw(bp, Sign::Pos, err, ToEven, ToZero, prec)` whenever `err`
/// does not exceed the number of bits in `bp`. Iterative refinement checks `prec + 1` bits when
/// rounding to nearest, which also determines the correct ternary value.
pub fn round_p(bp: &[Word], err: Exponent, prec: usize) -> bool {
    let n = bp.len() * WORD_BIT_SIZE;
    if err <= 0 || err as u64 <= prec as u64 || prec >= n {
        return false;
    }
    let err = (err as u64).min(n as u64) as usize;

    // bit range counted from the least significant bit
    let (lo, hi) = (n - err, n - prec);
    let mut zeros = true;
    let mut ones = true;
    for i in lo / WORD_BIT_SIZE..=(hi - 1) / WORD_BIT_SIZE {
        let base = i * WORD_BIT_SIZE;
        let a = lo.max(base) - base;
        let b = hi.min(base + WORD_BIT_SIZE) - base;
        let mask = low_mask(b) & !low_mask(a);
        let w = bp[i] & mask;
        zeros &= w == 0;
        ones &= w == mask;
        if !zeros && !ones {
            return true;
        }
    }
    false
}

impl BigFloat {
    /// Returns true if `self`, which approximates an unknown value `x` with the error
    /// `|x - self| <= 2^(EXP(self) - err)`, can be rounded correctly to `prec` bits using the rounding mode `rnd2`.
    /// `rnd1` tells on which side of `x` the approximation lies. See `can_round_raw`.
    /// Always false for singular values.
    pub fn can_round(&self, err: Exponent, rnd1: RoundingMode, rnd2: RoundingMode, prec: usize) -> bool {
        self.is_regular() && can_round_raw(&self.m, self.s, err, rnd1, rnd2, prec)
    }

    /// Iterative refinement check: `self` can be rounded to `prec` bits using `rm`, and the ternary value is known.
    #[inline]
    pub(crate) fn ziv_can_round(&self, err: Exponent, prec: usize, rm: RoundingMode) -> bool {
        self.is_regular() && round_p(&self.m, err, prec + (rm == RoundingMode::ToEven) as usize)
    }
}
