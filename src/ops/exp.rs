//! Exponentials.

use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;

use crate::common::consts::ONE;
use crate::defs::{Error, Exponent, RoundingMode, Sign};
use crate::flags::ExpoGuard;
use crate::num::{BigFloat, Kind};
use crate::ops::consts::{ln10_bounds, ln2_bounds};
use crate::ops::log::signed_dyadic;
use crate::ops::series::{exp_bounds, Bounds};
use crate::ops::ziv::{near_one, working_prec, ziv, Attempt};

/// Base of an exponential function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Base {
    E,
    Two,
    Ten,
}

impl Base {
    fn name(&self) -> &'static str {
        match self {
            Base::E => "exp",
            Base::Two => "exp2",
            Base::Ten => "exp10",
        }
    }

    // |x| × ln(base) < 2^(EXP(x) + log_bits)
    fn log_bits(&self) -> Exponent {
        match self {
            Base::E => 0,
            Base::Two => 0,
            Base::Ten => 2,
        }
    }
}

/// The value of a regular integer `x` of a moderate exponent.
pub(crate) fn integer_of(x: &BigFloat) -> BigInt {
    let (n, q) = signed_dyadic(x);
    if q >= 0 {
        n << q as usize
    } else {
        n >> (-q) as usize
    }
}

impl BigFloat {
    /// Sets `self` to `e^x` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn exp(&mut self, x: &Self, rm: RoundingMode) -> Result<i32, Error> {
        self.exp_base(x, Base::E, rm)
    }

    /// Sets `self` to `2^x` rounded using the rounding mode `rm`. Returns the ternary value.
    /// The result is exact for integer `x`.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn exp2(&mut self, x: &Self, rm: RoundingMode) -> Result<i32, Error> {
        self.exp_base(x, Base::Two, rm)
    }

    /// Sets `self` to `10^x` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn exp10(&mut self, x: &Self, rm: RoundingMode) -> Result<i32, Error> {
        self.exp_base(x, Base::Ten, rm)
    }

    fn exp_base(&mut self, x: &Self, base: Base, rm: RoundingMode) -> Result<i32, Error> {
        match x.kind {
            Kind::Nan => {
                self.set_nan();
                return Ok(0);
            }
            Kind::Inf => {
                if x.s.is_negative() {
                    self.set_zero(Sign::Pos);
                } else {
                    self.set_inf(Sign::Pos);
                }
                return Ok(0);
            }
            Kind::Zero => return Ok(self.set_ui(1, rm)),
            Kind::Regular => {}
        }

        // the result exponent does not fit the absolute limits
        if x.e > 62 {
            return Ok(if x.s.is_negative() {
                let rm = if rm == RoundingMode::ToEven { RoundingMode::ToZero } else { rm };
                self.underflow(rm, Sign::Pos)
            } else {
                self.overflow(rm, Sign::Pos)
            });
        }

        if x.is_integer() {
            if let Some(k) = integer_of(x).to_i64() {
                match base {
                    Base::Two => return Ok(self.mul_2si(&ONE, k, rm)),
                    Base::Ten if k >= 0 && k as u64 <= self.p as u64 + 64 => {
                        // 10^k = 5^k × 2^k
                        let n = BigUint::from(5u8).pow(k as u32);
                        return Ok(self.set_natural(&n, k as i128, false, Sign::Pos, rm));
                    }
                    _ => {}
                }
            }
        }

        let guard = ExpoGuard::new();

        if x.e + base.log_bits() < -(self.p as Exponent) - 1 {
            let t = near_one(self, x.s, rm);
            return Ok(guard.finish(self, t, rm));
        }

        let (n, q) = signed_dyadic(x);
        let arg = |s: usize| {
            let v = Bounds::of_dyadic(&n, q, s);
            match base {
                Base::E => v,
                Base::Two => v.mul(&ln2_bounds(s)),
                Base::Ten => v.mul(&ln10_bounds(s)),
            }
        };

        let w0 = working_prec(self.p, 8);
        ziv(self, rm, guard, base.name(), w0, |w| {
            let (b, sh) = exp_bounds(&arg, w);
            Attempt::from_bounds(&b, sh)
        })
    }
}
