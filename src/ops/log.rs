//! Logarithms.

use core::cmp::Ordering;

use num_bigint::{BigInt, BigUint};
use num_traits::One;

use crate::defs::{Error, Exponent, RoundingMode, Sign};
use crate::flags::{raise, ExceptionFlags, ExpoGuard};
use crate::num::{BigFloat, Kind};
use crate::ops::consts::ln2_bounds;
use crate::ops::series::{ln1p_small, ln_dyadic, shl_ceil, Bounds};
use crate::ops::ziv::{round_near_x, working_prec, ziv, Attempt};

/// The value of a regular number as a signed integer and the weight of its last bit.
pub(crate) fn signed_dyadic(x: &BigFloat) -> (BigInt, i128) {
    let (n, q) = x.significand_and_lsb();
    let n = BigInt::from(n);
    (if x.s.is_negative() { -n } else { n }, q)
}

/// `1 + x` as `n × 2^q` for a regular `x > -1`. The exponent of `x` must be moderate.
pub(crate) fn one_plus(x: &BigFloat) -> (BigUint, i128) {
    let (n, q) = signed_dyadic(x);
    let (m, l) = if q >= 0 {
        ((n << q as usize) + 1u32, 0)
    } else {
        (n + (BigInt::one() << (-q) as usize), q)
    };
    (m.into_parts().1, l)
}

/// Encloses `ln(1 + x)` for a regular `x > -1`.
pub(crate) fn ln1p_bounds(x: &BigFloat, s: usize) -> Bounds {
    if x.e <= -1 {
        let (n, q) = signed_dyadic(x);
        ln1p_small(&n, q, s)
    } else if x.e > s as Exponent + 2 {
        // ln(x) < ln(1 + x) < ln(x) + 1/x
        let (n, q) = x.significand_and_lsb();
        let mut b = ln_dyadic(&n, q, s);
        b.hi += shl_ceil(&BigInt::one(), b.s as i128 + 1 - x.e as i128);
        b
    } else {
        let (n, q) = one_plus(x);
        ln_dyadic(&n, q, s)
    }
}

/// Encloses `ln(x)` for a regular `x > 0`.
pub(crate) fn ln_bounds(x: &BigFloat, s: usize) -> Result<Bounds, Error> {
    if x.e == 0 || x.e == 1 {
        // x - 1 is exact at the precision of x
        let mut d = BigFloat::new(x.precision())?;
        let inex = d.sub_ui(x, 1, RoundingMode::ToEven);
        debug_assert_eq!(inex, 0);
        if d.is_zero() {
            return Ok(Bounds::zero(s));
        }
        Ok(ln1p_bounds(&d, s))
    } else {
        let (n, q) = x.significand_and_lsb();
        Ok(ln_dyadic(&n, q, s))
    }
}

/// Source of enclosures of `ln(x)` for a regular `x > 0` with `x != 1`.
pub(crate) struct LnArg {
    // x - 1 when x is in [1/2, 2)
    d: Option<BigFloat>,
    n: BigUint,
    q: i128,

    /// `|ln(x)| < 2^bits`
    pub bits: Exponent,
}

impl LnArg {
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for `x - 1`.
    pub fn new(x: &BigFloat) -> Result<Self, Error> {
        debug_assert!(x.is_regular() && x.s.is_positive());
        let (n, q) = x.significand_and_lsb();
        if x.e == 0 || x.e == 1 {
            // |ln(x)| <= 2|x - 1| on [1/2, 2)
            let mut d = BigFloat::new(x.precision())?;
            let inex = d.sub_ui(x, 1, RoundingMode::ToEven);
            debug_assert!(inex == 0 && d.is_regular());
            let bits = d.e + 1;
            Ok(LnArg { d: Some(d), n, q, bits })
        } else {
            // |ln(x)| < (|e| + 1) × ln(2)
            let k = x.e.unsigned_abs() + 1;
            let bits = (u64::BITS - k.leading_zeros()) as Exponent;
            Ok(LnArg { d: None, n, q, bits })
        }
    }

    /// Returns true if `x > 1`.
    pub fn is_positive(&self) -> bool {
        match &self.d {
            Some(d) => d.s.is_positive(),
            None => self.n.bits() as i128 + self.q > 0,
        }
    }

    /// Enclosure of `ln(x)` at the scale `s` or a larger one.
    pub fn bounds(&self, s: usize) -> Bounds {
        match &self.d {
            Some(d) => ln1p_bounds(d, s),
            None => ln_dyadic(&self.n, self.q, s),
        }
    }
}

impl BigFloat {
    // Singular cases shared by log and log2. Returns None if x is positive and regular.
    fn log_special(&mut self, x: &Self) -> Option<i32> {
        match x.kind {
            Kind::Nan => self.set_nan(),
            Kind::Zero => {
                raise(ExceptionFlags::DIVBY0);
                self.set_inf(Sign::Neg);
            }
            _ if x.s.is_negative() => self.set_nan(),
            Kind::Inf => self.set_inf(Sign::Pos),
            Kind::Regular => {
                if x.cmp_ui(1) != Some(Ordering::Equal) {
                    return None;
                }
                self.set_zero(Sign::Pos);
            }
        }
        Some(0)
    }

    // Singular cases shared by log1p and log2p1. Returns None if x > -1 is regular.
    fn log1p_special(&mut self, x: &Self) -> Option<i32> {
        match x.kind {
            Kind::Nan => self.set_nan(),
            Kind::Zero => self.set_zero(x.s),
            Kind::Inf if x.s.is_negative() => self.set_nan(),
            Kind::Inf => self.set_inf(Sign::Pos),
            Kind::Regular => match x.cmp_si(-1) {
                Some(Ordering::Less) => self.set_nan(),
                Some(Ordering::Equal) => {
                    raise(ExceptionFlags::DIVBY0);
                    self.set_inf(Sign::Neg);
                }
                _ => return None,
            },
        }
        Some(0)
    }

    /// Sets `self` to the natural logarithm of `x` rounded using the rounding mode `rm`.
    /// Returns the ternary value.
    ///
    /// `log(±0)` is `-Inf` with the division by zero flag raised, and the logarithm of a negative
    /// number is NaN. `log(1)` is `+0`.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn log(&mut self, x: &Self, rm: RoundingMode) -> Result<i32, Error> {
        if let Some(t) = self.log_special(x) {
            return Ok(t);
        }

        if x.e == 0 || x.e == 1 {
            let mut d = BigFloat::new(x.precision())?;
            {
                let _g = ExpoGuard::new();
                d.sub_ui(x, 1, RoundingMode::ToEven);
            }
            return self.log1p_regular(&d, rm);
        }

        let (n, q) = x.significand_and_lsb();
        let guard = ExpoGuard::new();
        let w0 = working_prec(self.p, 8);
        ziv(self, rm, guard, "log", w0, |w| Attempt::from_bounds(&ln_dyadic(&n, q, w), 0))
    }

    /// Sets `self` to the base 2 logarithm of `x` rounded using the rounding mode `rm`.
    /// Returns the ternary value. The result is exact for powers of two.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn log2(&mut self, x: &Self, rm: RoundingMode) -> Result<i32, Error> {
        if let Some(t) = self.log_special(x) {
            return Ok(t);
        }

        if x.is_power_of_two_raw() {
            return Ok(self.set_si(x.e - 1, rm));
        }

        let guard = ExpoGuard::new();
        let w0 = working_prec(self.p, 8);
        ziv(self, rm, guard, "log2", w0, |w| {
            let l = ln_bounds(x, w)?;
            match l.div(&ln2_bounds(l.s)) {
                Some(b) => Attempt::from_bounds(&b, 0),
                None => Ok(Attempt::Retry),
            }
        })
    }

    /// Sets `self` to `ln(1 + x)` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// The result is NaN for `x < -1`, and `-Inf` with the division by zero flag raised for `x = -1`.
    /// Signed zeros are kept.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn log1p(&mut self, x: &Self, rm: RoundingMode) -> Result<i32, Error> {
        if let Some(t) = self.log1p_special(x) {
            return Ok(t);
        }
        self.log1p_regular(x, rm)
    }

    // ln(1 + x) for regular x > -1
    fn log1p_regular(&mut self, x: &Self, rm: RoundingMode) -> Result<i32, Error> {
        let q = self.p.max(x.p) as Exponent;
        if x.e <= -q - 2 {
            // |ln(1 + x) - x| < x² < 2^(EXP(x) - q - 2), and ln(1 + x) < x
            return Ok(round_near_x(self, x, false, rm));
        }

        let guard = ExpoGuard::new();
        let w0 = working_prec(self.p, 8);
        ziv(self, rm, guard, "log1p", w0, |w| Attempt::from_bounds(&ln1p_bounds(x, w), 0))
    }

    /// Sets `self` to `log2(1 + x)` rounded using the rounding mode `rm`. Returns the ternary value.
    /// The result is exact when `1 + x` is a power of two.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn log2p1(&mut self, x: &Self, rm: RoundingMode) -> Result<i32, Error> {
        if let Some(t) = self.log1p_special(x) {
            return Ok(t);
        }

        // 1 + x = 2^k needs at least k bits of x when k > 0
        if x.e >= 0 && x.e <= x.p as Exponent + 1 {
            let (n, l) = one_plus(x);
            if n.bits() == n.trailing_zeros().unwrap_or(0) + 1 {
                let k = n.bits() as i128 - 1 + l;
                return Ok(self.set_si(k as i64, rm));
            }
        }

        let guard = ExpoGuard::new();
        let w0 = working_prec(self.p, 8);
        ziv(self, rm, guard, "log2p1", w0, |w| {
            if x.e < -(w as Exponent) {
                // ln(1 + x) = x × r with |r - 1| <= |x|
                let (n, q) = signed_dyadic(x);
                let d = shl_ceil(&BigInt::one(), w as i128 + x.e as i128);
                let one = BigInt::one() << w;
                let r = Bounds {
                    lo: &one - &d,
                    hi: &one + &d,
                    s: w,
                };
                let v = Bounds::of_dyadic(&n, 0, w).mul(&r);
                return match v.div(&ln2_bounds(w)) {
                    Some(b) => Attempt::from_bounds(&b, q),
                    None => Ok(Attempt::Retry),
                };
            }
            let l = ln1p_bounds(x, w);
            match l.div(&ln2_bounds(l.s)) {
                Some(b) => Attempt::from_bounds(&b, 0),
                None => Ok(Attempt::Retry),
            }
        })
    }
}
