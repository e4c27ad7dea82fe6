//! Comparison.

use core::cmp::Ordering;

use num_bigint::BigUint;

use crate::common::util::{cmp_aligned, is_power_of_two, words_to_biguint};
use crate::defs::{Sign, WORD_BIT_SIZE};
use crate::flags::{raise, ExceptionFlags};
use crate::num::{BigFloat, Kind};

impl BigFloat {
    /// Compares `self` to `d2`.
    /// Returns None and raises the range error flag if any of the values is NaN.
    pub fn cmp(&self, d2: &Self) -> Option<Ordering> {
        if self.is_nan() || d2.is_nan() {
            raise(ExceptionFlags::ERANGE);
            return None;
        }
        Some(self.cmp_signed(d2, d2.s))
    }

    /// Compares the absolute values of `self` and `d2`.
    /// Returns None and raises the range error flag if any of the values is NaN.
    pub fn cmp_abs(&self, d2: &Self) -> Option<Ordering> {
        if self.is_nan() || d2.is_nan() {
            raise(ExceptionFlags::ERANGE);
            return None;
        }
        Some(self.cmp_mag(d2))
    }

    /// Compares `self` to `u`.
    pub fn cmp_ui(&self, u: u64) -> Option<Ordering> {
        self.cmp(&BigFloat::exact_ui(u))
    }

    /// Compares `self` to `i`.
    pub fn cmp_si(&self, i: i64) -> Option<Ordering> {
        self.cmp(&BigFloat::exact_si(i))
    }

    /// Compares `self` to `f`. NaN `f` behaves as a NaN argument of `cmp`.
    pub fn cmp_d(&self, f: f64) -> Option<Ordering> {
        self.cmp(&BigFloat::exact_d(f))
    }

    /// Returns true if `self` is equal to `d2`. False if any of them is NaN.
    pub fn equal(&self, d2: &Self) -> bool {
        !self.is_nan() && !d2.is_nan() && self.cmp_signed(d2, d2.s) == Ordering::Equal
    }

    // compare self with d2 having the sign s2; none is NaN
    pub(crate) fn cmp_signed(&self, d2: &Self, s2: Sign) -> Ordering {
        let sign_of = |x: &Self, s: Sign| -> i32 {
            if x.kind == Kind::Zero {
                0
            } else {
                s.to_int()
            }
        };
        let (a, b) = (sign_of(self, self.s), sign_of(d2, s2));
        if a != b {
            return a.cmp(&b);
        }
        if a == 0 {
            return Ordering::Equal;
        }
        let o = self.cmp_mag(d2);
        if a < 0 {
            o.reverse()
        } else {
            o
        }
    }

    // compare magnitudes; none is NaN
    pub(crate) fn cmp_mag(&self, d2: &Self) -> Ordering {
        match (self.kind, d2.kind) {
            (Kind::Inf, Kind::Inf) | (Kind::Zero, Kind::Zero) => Ordering::Equal,
            (Kind::Inf, _) | (_, Kind::Zero) => Ordering::Greater,
            (_, Kind::Inf) | (Kind::Zero, _) => Ordering::Less,
            _ => {
                if self.e != d2.e {
                    self.e.cmp(&d2.e)
                } else {
                    cmp_aligned(&self.m, &d2.m)
                }
            }
        }
    }
}

impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            None
        } else {
            Some(self.cmp_signed(other, other.s))
        }
    }
}

/// Compares magnitudes of the regular values `b` and `c`, and counts the bits cancelled
/// in the difference of the magnitudes: if `|b| > |c|`, then `EXP(|b| - |c|) = EXP(b) - cancel`,
/// and symmetrically if `|c| > |b|`. The count is 0 if the magnitudes are equal.
pub(crate) fn cmp2(b: &BigFloat, c: &BigFloat) -> (Ordering, u64) {
    debug_assert!(b.is_regular() && c.is_regular());

    let (hi, lo, ord) = if b.e > c.e {
        (b, c, Ordering::Greater)
    } else if b.e < c.e {
        (c, b, Ordering::Less)
    } else {
        match cmp_aligned(&b.m, &c.m) {
            Ordering::Equal => return (Ordering::Equal, 0),
            Ordering::Greater => (b, c, Ordering::Greater),
            Ordering::Less => (c, b, Ordering::Less),
        }
    };

    let diff = (hi.e as i128 - lo.e as i128) as u128;
    let hn = (hi.m.len() * WORD_BIT_SIZE) as u128;
    if diff >= hn {
        // lo is below the last bit of hi's significand words
        let cancel = if is_power_of_two(&hi.m) { 1 } else { 0 };
        return (ord, cancel);
    }

    let hl = hi.e as i128 - hn as i128;
    let ll = lo.e as i128 - (lo.m.len() * WORD_BIT_SIZE) as i128;
    let lsb = hl.min(ll);
    let h: BigUint = words_to_biguint(&hi.m) << (hl - lsb) as usize;
    let l: BigUint = words_to_biguint(&lo.m) << (ll - lsb) as usize;
    let d = h - l;
    let cancel = hi.e as i128 - (lsb + d.bits() as i128);
    debug_assert!(cancel >= 0);

    (ord, cancel as u64)
}
