//! Compound interest function `(1 + x)^y`.

use core::cmp::Ordering;

use num_traits::ToPrimitive;

use crate::common::util::log2_ceil;
use crate::defs::{Error, Exponent, RoundingMode, Sign, WORD_BIT_SIZE};
use crate::flags::{clear_flags, emax, emin, flags, raise, ExceptionFlags, ExpoGuard};
use crate::num::{BigFloat, Kind};
use crate::ops::exp::integer_of;
use crate::ops::pow::underflow_rm;
use crate::ops::ziv::near_one;

impl BigFloat {
    /// Sets `self` to `(1 + x)^n` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// `(1 + x)^0` is 1 for any `x >= -1`, NaN and `+Inf` included. `x < -1` gives NaN,
    /// and `x = -1` gives `+0` for a positive `n` or `+Inf` with the division by zero flag
    /// for a negative `n`.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn compound_si(&mut self, x: &Self, n: i64, rm: RoundingMode) -> Result<i32, Error> {
        match x.kind {
            Kind::Inf if x.s.is_negative() => {
                self.set_nan();
                return Ok(0);
            }
            Kind::Nan | Kind::Inf | Kind::Zero if n == 0 || x.is_zero() => return Ok(self.set_ui(1, rm)),
            Kind::Nan => {
                self.set_nan();
                return Ok(0);
            }
            Kind::Inf => {
                if n < 0 {
                    self.set_zero(Sign::Pos);
                } else {
                    self.set_inf(Sign::Pos);
                }
                return Ok(0);
            }
            _ => {}
        }

        match x.cmp_si(-1) {
            Some(Ordering::Less) => {
                self.set_nan();
                return Ok(0);
            }
            _ if n == 0 => return Ok(self.set_ui(1, rm)),
            Some(Ordering::Equal) => {
                if n < 0 {
                    raise(ExceptionFlags::DIVBY0);
                    self.set_inf(Sign::Pos);
                } else {
                    self.set_zero(Sign::Pos);
                }
                return Ok(0);
            }
            _ => {}
        }

        if n == 1 {
            return Ok(self.add_ui(x, 1, rm));
        }

        self.compound_regular(x, &BigFloat::exact_si(n), Some(n), rm)
    }

    /// Sets `self` to `(1 + x)^y` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// Singular values follow `compound_si` and the rules of `pow`: `(1 + 0)^y` is 1 even
    /// for NaN `y`, and an infinite `y` gives `+0` or `+Inf` depending on the side of `x` from 0.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn compound(&mut self, x: &Self, y: &Self, rm: RoundingMode) -> Result<i32, Error> {
        if x.is_inf() && x.s.is_negative() {
            self.set_nan();
            return Ok(0);
        }
        if !x.is_regular() {
            if x.is_zero() || y.is_zero() {
                return Ok(self.set_ui(1, rm));
            }
            if x.is_nan() || y.is_nan() {
                self.set_nan();
                return Ok(0);
            }
            // x = +Inf
            if y.s.is_negative() {
                self.set_zero(Sign::Pos);
            } else {
                self.set_inf(Sign::Pos);
            }
            return Ok(0);
        }
        if y.is_nan() {
            self.set_nan();
            return Ok(0);
        }

        let o = x.cmp_si(-1);
        if o == Some(Ordering::Less) {
            self.set_nan();
            return Ok(0);
        }
        if y.is_zero() {
            return Ok(self.set_ui(1, rm));
        }
        if o == Some(Ordering::Equal) {
            if y.s.is_negative() {
                if !y.is_inf() {
                    raise(ExceptionFlags::DIVBY0);
                }
                self.set_inf(Sign::Pos);
            } else {
                self.set_zero(Sign::Pos);
            }
            return Ok(0);
        }

        if y.is_inf() {
            if x.s != y.s {
                self.set_zero(Sign::Pos);
            } else {
                self.set_inf(Sign::Pos);
            }
            return Ok(0);
        }

        if y.is_integer() && y.e <= 64 {
            if let Some(n) = integer_of(y).to_i64() {
                return self.compound_si(x, n, rm);
            }
        }

        self.compound_regular(x, y, None, rm)
    }

    // (1 + x)^y for a regular x > -1 and a regular y, computed as 2^(y × log2(1 + x)).
    // `n` is the value of y if y is a machine integer.
    fn compound_regular(&mut self, x: &Self, y: &Self, n: Option<i64>, rm: RoundingMode) -> Result<i32, Error> {
        let (user_emin, user_emax) = (emin(), emax());
        let mut guard = ExpoGuard::new();

        let py = self.p;
        let mut prec = py + log2_ceil(py as u64) as usize + 6;
        let mut inc = WORD_BIT_SIZE;

        // |y| < 2^k
        let k = y.e.max(0);

        // log2(1 + x) is computed with extra bits since 2^u loses the bits of the exponent
        let mut extra = 0usize;

        let mut t = BigFloat::new(prec)?;
        for nloop in 0usize.. {
            let precu = prec + extra;

            // 1 + x fits in the working precision, which covers all exact results
            t.set_prec(prec)?;
            if t.add_ui(x, 1, RoundingMode::ToZero) == 0 {
                clear_flags();
                let inex = self.pow(&t, y, rm)?;
                guard.update_flags(flags());
                return Ok(guard.finish(self, inex, rm));
            }

            // the result is rounded toward 1, so y × log2(1 + x) is rounded toward 0
            let mut u1 = BigFloat::new(precu)?;
            let mut inex = u1.log2p1(x, RoundingMode::ToZero)? != 0;
            let mut e = u1.e;
            let mut u = BigFloat::new(precu)?;
            inex |= u.mul(&u1, y, RoundingMode::ToZero) != 0;

            if u.is_zero() {
                let t = near_one(self, u.s, rm);
                return Ok(guard.finish(self, t, rm));
            }

            // |u - y × log2(1 + x)| <= 2^(e - precu)
            let e2 = u.e;
            debug_assert!(e2 <= e + k);
            e += k + 1;

            if u.cmp_si(user_emax) != Some(Ordering::Less) {
                drop(guard);
                return Ok(self.overflow(rm, Sign::Pos));
            }
            if u.cmp_si(user_emin - 1) == Some(Ordering::Less) {
                drop(guard);
                return Ok(self.underflow(underflow_rm(rm), Sign::Pos));
            }

            // |2^u - 1| < |u| < 1/4 × ulp(1)
            if nloop == 0 && e2 < -(py as Exponent) {
                let t = near_one(self, u.s, rm);
                return Ok(guard.finish(self, t, rm));
            }

            let toward_one = if u.s.is_positive() {
                RoundingMode::Down
            } else {
                RoundingMode::Up
            };
            inex |= t.exp2(&u, toward_one)? != 0;

            let precu_e = precu as Exponent;
            let prec_e = prec as Exponent;
            if e < precu_e {
                // |t - (1 + x)^y| < 2^e3 × ulp(t)
                let e3 = if precu_e - prec_e >= e {
                    1
                } else {
                    e + 1 - (precu_e - prec_e)
                };
                if !inex || t.ziv_can_round(prec_e - e3, py, rm) {
                    break;
                }

                // t is rounded toward 1, so a short t tells on which side the exact value is
                if t.min_prec() <= py + 1 && prec_e - py as Exponent >= e3 + 1 {
                    if toward_one == RoundingMode::Down {
                        t.nextabove();
                    } else {
                        t.nextbelow();
                    }
                    break;
                }
            }

            if nloop == 0 {
                if let Some(n) = n {
                    if let Some(inex) = self.compound_large_even(x, n, prec, rm)? {
                        log::trace!("compound: x^{} fits the precision {}", n, py);
                        return Ok(guard.finish(self, inex, rm));
                    }
                }
            }

            log::trace!("compound: working precision {} is not enough", prec);
            prec += inc;
            inc = prec / 2;
            extra = e2.max(0) as usize;
        }

        let inex = self.set(&t, rm);
        Ok(guard.finish(self, inex, rm))
    }

    // (1 + x)^n for a large even integer x and n > 1, when x^n fits the target precision
    // and (1 + x)^n is close enough to x^n. Returns None if this does not apply.
    fn compound_large_even(&mut self, x: &Self, n: i64, prec: usize, rm: RoundingMode) -> Result<Option<i32>, Error> {
        let ex = x.e;
        if n <= 1 || ex < 17 {
            return Ok(None);
        }

        // x^n has at least n × (kx - 1) + 1 bits
        let kx = x.min_prec() as Exponent;
        let p = self.p + (rm == RoundingMode::ToEven) as usize;
        if kx >= ex || (n as i128) * (kx as i128 - 1) > p as i128 - 1 {
            return Ok(None);
        }

        let mut v = BigFloat::new(p)?;
        if v.pow_ui(x, n as u64, RoundingMode::ToZero)? != 0 {
            return Ok(None);
        }

        // (1 + x)^n = x^n × (1 + 1/x)^n
        let mut r = BigFloat::new(prec)?;
        r.ui_div(1, x, RoundingMode::Up);
        let mut r1 = BigFloat::new(prec)?;
        r1.add_ui(&r, 1, RoundingMode::Up);
        r.pow_ui(&r1, n as u64, RoundingMode::Up)?;
        r1.sub_ui(&r, 1, RoundingMode::Up);
        if !r1.is_regular() || r1.e >= -(self.p as Exponent) {
            return Ok(None);
        }

        self.set(&v, RoundingMode::ToZero);
        let up = match rm {
            RoundingMode::ToEven => v.min_prec() == p,
            RoundingMode::Up | RoundingMode::FromZero => true,
            _ => false,
        };
        if up {
            self.nextabove();
            Ok(Some(1))
        } else {
            Ok(Some(-1))
        }
    }
}
