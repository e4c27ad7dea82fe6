//! Exponentiation.

use core::cmp::Ordering;

use num_bigint::{BigInt, BigUint, Sign as BigSign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::common::consts::ONE;
use crate::defs::{Error, Exponent, RoundingMode, Sign};
use crate::flags::{clear_flags, emax, emin, flags, raise, ExceptionFlags, ExpoGuard};
use crate::num::{BigFloat, Kind};
use crate::ops::exp::integer_of;
use crate::ops::log::{signed_dyadic, LnArg};
use crate::ops::series::{exp_bounds, Bounds};
use crate::ops::ziv::{near_one_signed, working_prec, ziv, Attempt};

// arguments of exp beyond 2^63 in magnitude at the scale 64
const HUGE_ARG_BITS: u64 = 64 + 64;

/// Computes `|x|^n` as `r × 2^scale` with every operation rounded away from zero at the
/// precision `w`. The exponent of `r` is moved into `scale` after each step, so intermediate
/// values stay near 1 whatever the magnitude of the result.
/// The relative error of `r` is less than `2^(bits(n) + 3 - w)`.
fn pow_from_zero(x: &BigFloat, n: &BigUint, w: usize) -> Result<(BigFloat, BigInt), Error> {
    let mut a = BigFloat::new(w)?;
    a.set_abs(x, RoundingMode::FromZero);
    let ea = BigInt::from(take_exponent(&mut a));

    let mut r = a.clone();
    let mut scale = ea.clone();
    let mut t = BigFloat::new(w)?;
    for i in (0..n.bits() - 1).rev() {
        t.sqr(&r, RoundingMode::FromZero);
        core::mem::swap(&mut r, &mut t);
        scale = (scale << 1usize) + take_exponent(&mut r);
        if n.bit(i) {
            t.mul(&r, &a, RoundingMode::FromZero);
            core::mem::swap(&mut r, &mut t);
            scale += &ea + take_exponent(&mut r);
        }
    }

    Ok((r, scale))
}

// Sets the exponent of a regular `x` to 0 and returns the previous exponent.
fn take_exponent(x: &mut BigFloat) -> Exponent {
    let e = x.e;
    x.e = 0;
    e
}

// The sign of x^z for an integer z.
fn int_pow_sign(x: &BigFloat, odd: bool) -> Sign {
    if odd {
        x.s
    } else {
        Sign::Pos
    }
}

impl BigFloat {
    /// Sets `self` to `x^n` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// `x^0` is 1 for any `x`, NaN included, and `x^2` is computed as `sqr(x)`.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn pow_ui(&mut self, x: &Self, n: u64, rm: RoundingMode) -> Result<i32, Error> {
        self.pow_z(x, &BigInt::from(n), rm)
    }

    /// Sets `self` to `x^n` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// For negative `n`, `±0^n` is an infinity with the division by zero flag raised.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn pow_si(&mut self, x: &Self, n: i64, rm: RoundingMode) -> Result<i32, Error> {
        self.pow_z(x, &BigInt::from(n), rm)
    }

    /// Sets `self` to `n^m` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn ui_pow_ui(&mut self, n: u64, m: u64, rm: RoundingMode) -> Result<i32, Error> {
        self.pow_ui(&BigFloat::exact_ui(n), m, rm)
    }

    /// Sets `self` to `n^y` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn ui_pow(&mut self, n: u64, y: &Self, rm: RoundingMode) -> Result<i32, Error> {
        self.pow(&BigFloat::exact_ui(n), y, rm)
    }

    /// Sets `self` to `x^z` for an integer `z`, rounded using the rounding mode `rm`.
    /// Returns the ternary value.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn pow_z(&mut self, x: &Self, z: &BigInt, rm: RoundingMode) -> Result<i32, Error> {
        if z.is_zero() {
            return Ok(self.set_ui(1, rm));
        }

        let neg = z.is_negative();
        let s = int_pow_sign(x, z.is_odd());

        match x.kind {
            Kind::Nan => {
                self.set_nan();
                return Ok(0);
            }
            Kind::Inf => {
                if neg {
                    self.set_zero(s);
                } else {
                    self.set_inf(s);
                }
                return Ok(0);
            }
            Kind::Zero => {
                if neg {
                    raise(ExceptionFlags::DIVBY0);
                    self.set_inf(s);
                } else {
                    self.set_zero(s);
                }
                return Ok(0);
            }
            Kind::Regular => {}
        }

        if let Some(k) = z.to_i8() {
            match k {
                1 => return Ok(self.set(x, rm)),
                2 => return Ok(self.sqr(x, rm)),
                -1 => return Ok(self.ui_div(1, x, rm)),
                _ => {}
            }
        }

        let e = BigInt::from(x.e);
        let e1 = &e - BigInt::one();
        if x.is_power_of_two_raw() {
            // |x| = 2^(e - 1)
            let k = &e1 * z;
            return Ok(match k.to_i128() {
                Some(k) => self.set_natural(&BigUint::one(), k, false, s, rm),
                None if k.is_positive() => self.overflow(rm, s),
                None => self.underflow(underflow_rm(rm), s),
            });
        }

        // 2^(e - 1) < |x| < 2^e
        let (lo, hi) = if neg { (&e * z, &e1 * z) } else { (&e1 * z, &e * z) };
        if lo >= BigInt::from(emax()) {
            return Ok(self.overflow(rm, s));
        }
        if hi < BigInt::from(emin() - 1) {
            return Ok(self.underflow(underflow_rm(rm), s));
        }

        let guard = ExpoGuard::new();
        let n = z.magnitude();
        let nbits = n.bits() as Exponent;
        let w0 = working_prec(self.p, nbits as usize + 4);

        ziv(self, rm, guard, "pow_z", w0, |w| {
            clear_flags();

            // |x|^|z| = t × 2^scale with 1/2 <= t < 1
            let (mut t, mut scale) = pow_from_zero(x, n, w)?;
            let mut err = w as Exponent - nbits - 3;
            if neg {
                let mut r = BigFloat::new(w)?;
                r.ui_div(1, &t, RoundingMode::ToZero);
                t = r;
                scale = -scale;
                err -= 1;
            }
            let inexact = flags().contains(ExceptionFlags::INEXACT);

            let shift = match scale.to_i128() {
                Some(shift) => shift,
                None if scale.is_positive() => return Ok(Attempt::Overflow(s)),
                None => return Ok(Attempt::Underflow(s)),
            };

            t.s = s;
            if inexact {
                Ok(Attempt::Approx { t, err, shift })
            } else {
                Ok(Attempt::Exact { t, shift })
            }
        })
    }

    /// Sets `self` to `x^y` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// Singular values follow the IEEE 754-2008 `pow` function: `x^±0` is 1 for any `x`,
    /// `1^y` is 1 for any `y`, and a negative `x` with a non-integer `y` gives NaN.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn pow(&mut self, x: &Self, y: &Self, rm: RoundingMode) -> Result<i32, Error> {
        if y.is_zero() {
            return Ok(self.set_ui(1, rm));
        }
        if x.is_regular() && x.s.is_positive() && x.e == 1 && x.is_power_of_two_raw() {
            return Ok(self.set_ui(1, rm));
        }
        if x.is_nan() || y.is_nan() {
            self.set_nan();
            return Ok(0);
        }

        let y_odd = is_odd_integer(y);

        if y.is_inf() {
            // |x| compared to 1; zero counts as less
            let o = if x.is_zero() {
                Ordering::Less
            } else {
                x.cmp_mag(&ONE)
            };
            match o {
                Ordering::Equal => {
                    self.set_ui(1, rm);
                }
                o if (o == Ordering::Greater) == y.s.is_positive() => self.set_inf(Sign::Pos),
                _ => self.set_zero(Sign::Pos),
            }
            return Ok(0);
        }

        if x.is_inf() {
            let s = int_pow_sign(x, y_odd);
            if y.s.is_negative() {
                self.set_zero(s);
            } else {
                self.set_inf(s);
            }
            return Ok(0);
        }

        if x.is_zero() {
            let s = int_pow_sign(x, y_odd);
            if y.s.is_negative() {
                raise(ExceptionFlags::DIVBY0);
                self.set_inf(s);
            } else {
                self.set_zero(s);
            }
            return Ok(0);
        }

        let y_int = y.is_integer();
        if x.s.is_negative() && !y_int {
            self.set_nan();
            return Ok(0);
        }

        if y_int && y.e <= 64 {
            return self.pow_z(x, &integer_of(y), rm);
        }

        if !y_int {
            if let Some((b, c)) = exact_pow_base(x, y) {
                log::trace!("pow: exact result for {:?} ^ {:?}", x, y);
                return self.pow_z(&b, &c, rm);
            }
        }

        self.pow_general(x, y, int_pow_sign(x, y_odd), rm)
    }

    // x^y for a regular x != ±1 and a regular y, where y is either not an integer, or a large one.
    fn pow_general(&mut self, x: &Self, y: &Self, s: Sign, rm: RoundingMode) -> Result<i32, Error> {
        let guard = ExpoGuard::new();

        let mut ax = x.clone();
        ax.s = Sign::Pos;
        if ax.e == 1 && ax.is_power_of_two_raw() {
            let t = self.set_si(s.to_int() as i64, rm);
            return Ok(guard.finish(self, t, rm));
        }

        let ln = LnArg::new(&ax)?;

        // |y × ln|x|| < 2^(EXP(y) + ln.bits)
        if y.e + ln.bits < -(self.p as Exponent) - 2 {
            let up = ln.is_positive() == y.s.is_positive();
            let t = near_one_signed(self, up, s, rm);
            return Ok(guard.finish(self, t, rm));
        }

        let (yn, yq) = signed_dyadic(y);
        let extra = y.e.max(0) as usize + ln.bits.max(0) as usize + 2;
        let arg = |sc: usize| {
            let l = ln.bounds(sc + extra);
            Bounds::of_dyadic(&yn, yq, l.s).mul(&l).rescale(sc)
        };

        let w0 = working_prec(self.p, 8);
        ziv(self, rm, guard, "pow", w0, |w| {
            let coarse = arg(64);
            if coarse.lo.bits() >= HUGE_ARG_BITS && coarse.lo.is_positive() {
                return Ok(Attempt::Overflow(s));
            }
            if coarse.hi.bits() >= HUGE_ARG_BITS && coarse.hi.is_negative() {
                return Ok(Attempt::Underflow(s));
            }

            let (b, sh) = exp_bounds(&arg, w);
            let mut a = Attempt::from_bounds(&b, sh)?;
            if s.is_negative() {
                match &mut a {
                    Attempt::Approx { t, .. } | Attempt::Exact { t, .. } => t.neg(),
                    _ => {}
                }
            }
            Ok(a)
        })
    }
}

/// Rounding mode for a value known to be below half of the smallest positive number.
pub(crate) fn underflow_rm(rm: RoundingMode) -> RoundingMode {
    if rm == RoundingMode::ToEven {
        RoundingMode::ToZero
    } else {
        rm
    }
}

/// Returns true if `y` is an odd integer.
pub(crate) fn is_odd_integer(y: &BigFloat) -> bool {
    if !y.is_regular() || !y.is_integer() {
        return false;
    }
    let (n, q) = y.significand_and_lsb();
    let tz = n.trailing_zeros().unwrap_or(0) as i128;
    tz + q == 0
}

// For a positive regular x and a non-integer y = c × 2^-j, finds b and c such that
// x^y = b^c exactly, if x is the 2^j-th power of a dyadic number b.
fn exact_pow_base(x: &BigFloat, y: &BigFloat) -> Option<(BigFloat, BigInt)> {
    let (yn, yq) = signed_dyadic(y);
    let tz = yn.trailing_zeros().unwrap_or(0) as i128;
    let c = &yn >> tz as usize;
    let mut j = -(yq + tz);
    debug_assert!(j > 0);

    let (m, l) = x.significand_and_lsb();
    let tz = m.trailing_zeros().unwrap_or(0);
    let mut m = m >> tz as usize;
    let mut f = l + tz as i128;

    while j > 0 {
        if m.is_one() {
            if j >= 127 || f % (1i128 << j) != 0 {
                return None;
            }
            f >>= j;
            j = 0;
        } else {
            let r = m.sqrt();
            if f.is_odd() || &r * &r != m {
                return None;
            }
            m = r;
            f /= 2;
            j -= 1;
        }
    }

    let mut b = BigFloat::new(m.bits() as usize).ok()?;
    let inex = b.set_z_2exp(&BigInt::from_biguint(BigSign::Plus, m), f as Exponent, RoundingMode::ToEven);
    debug_assert_eq!(inex, 0);
    Some((b, c))
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::common::util::rand_p;
    use crate::flags::{clear_flags, flags, set_emax, set_emin};
    use crate::defs::{DEFAULT_EMAX, DEFAULT_EMIN};

    #[test]
    fn test_pow_ui_special() {
        let mut r = BigFloat::new(20).unwrap();
        let mut x = BigFloat::new(20).unwrap();

        x.set_nan();
        assert_eq!(r.pow_ui(&x, 0, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_ui(1), Some(Ordering::Equal));
        r.pow_ui(&x, 3, RoundingMode::ToEven).unwrap();
        assert!(r.is_nan());

        x.set_inf(Sign::Neg);
        r.pow_ui(&x, 3, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf() && r.is_sign_negative());
        r.pow_ui(&x, 4, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf() && !r.is_sign_negative());

        x.set_zero(Sign::Neg);
        r.pow_ui(&x, 5, RoundingMode::ToEven).unwrap();
        assert!(r.is_zero() && r.is_sign_negative());

        clear_flags();
        r.pow_si(&x, -3, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf() && r.is_sign_negative());
        assert!(flags().contains(ExceptionFlags::DIVBY0));
        r.pow_si(&x, -2, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf() && !r.is_sign_negative());

        x.set_inf(Sign::Pos);
        r.pow_si(&x, -2, RoundingMode::ToEven).unwrap();
        assert!(r.is_zero() && !r.is_sign_negative());
        clear_flags();
    }

    #[test]
    fn test_pow_ui_values() {
        let mut r = BigFloat::new(53).unwrap();
        let x = BigFloat::from_f64(1.1, 53).unwrap();
        r.pow_ui(&x, 100, RoundingMode::ToEven).unwrap();
        let e = 1.1f64.powi(100);
        assert!((r.get_d(RoundingMode::ToEven) - e).abs() <= e * 1e-14);

        r.pow_si(&x, -7, RoundingMode::ToEven).unwrap();
        let e = 1.1f64.powi(-7);
        assert!((r.get_d(RoundingMode::ToEven) - e).abs() <= e * 1e-15);

        // 3^40 needs 64 bits
        let mut r = BigFloat::new(64).unwrap();
        assert_eq!(r.ui_pow_ui(3, 40, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_ui(3u64.pow(40)), Some(Ordering::Equal));

        let mut r = BigFloat::new(10).unwrap();
        assert!(r.ui_pow_ui(3, 40, RoundingMode::Down).unwrap() < 0);
        let mut h = BigFloat::new(10).unwrap();
        assert!(h.ui_pow_ui(3, 40, RoundingMode::Up).unwrap() > 0);
        r.nextabove();
        assert!(r == h);

        let x = BigFloat::from_f64(-1.5, 10).unwrap();
        assert_eq!(r.pow_ui(&x, 3, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_d(-3.375), Some(Ordering::Equal));
        assert_eq!(r.pow_si(&x, -1, RoundingMode::ToEven).unwrap(), -1);

        let x = BigFloat::from_f64(0.25, 10).unwrap();
        assert_eq!(r.pow_si(&x, -5, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_ui(1024), Some(Ordering::Equal));
    }

    #[test]
    fn test_pow_ui_sqr() {
        for _ in 0..200 {
            let p = rand_p();
            let x = BigFloat::random_normal(rand_p(), -100, 100).unwrap();
            for rm in RoundingMode::DIRECTED_AND_NEAREST {
                let mut a = BigFloat::new(p).unwrap();
                let mut b = BigFloat::new(p).unwrap();
                let ta = a.pow_ui(&x, 2, rm).unwrap();
                let tb = b.sqr(&x, rm);
                assert!(a == b);
                assert_eq!(ta, tb);
            }
        }
    }

    #[test]
    fn test_pow_ui_bounds() {
        // the results of the directed roundings are neighbours
        for _ in 0..100 {
            let p = rand_p();
            let x = BigFloat::random_normal(rand_p(), -4, 4).unwrap();
            let n = rand::random::<u64>() % 1000 + 3;
            let mut lo = BigFloat::new(p).unwrap();
            let mut hi = BigFloat::new(p).unwrap();
            let tl = lo.pow_ui(&x, n, RoundingMode::Down).unwrap();
            let th = hi.pow_ui(&x, n, RoundingMode::Up).unwrap();
            if tl == 0 {
                assert_eq!(th, 0);
                assert!(lo == hi);
            } else {
                assert!(tl < 0 && th > 0);
                lo.nextabove();
                assert!(lo == hi);
            }
        }
    }

    #[test]
    fn test_pow_z_range() {
        let mut r = BigFloat::new(10).unwrap();
        let x = BigFloat::from_f64(3.0, 10).unwrap();

        clear_flags();
        r.pow_z(&x, &(BigInt::one() << 100usize), RoundingMode::ToEven).unwrap();
        assert!(r.is_inf());
        assert!(flags().contains(ExceptionFlags::OVERFLOW));

        clear_flags();
        let t = r.pow_z(&x, &-(BigInt::one() << 100usize), RoundingMode::Up).unwrap();
        assert!(r.is_regular());
        assert_eq!(t, 1);
        assert!(flags().contains(ExceptionFlags::UNDERFLOW));

        // close to the boundary of a reduced range
        set_emax(20).unwrap();
        set_emin(-20).unwrap();
        clear_flags();
        let x = BigFloat::from_f64(1.5, 10).unwrap();
        let t = r.pow_ui(&x, 34, RoundingMode::ToEven).unwrap();
        assert!(r.is_regular());
        assert!(t != 0);
        assert!(!flags().contains(ExceptionFlags::OVERFLOW));
        r.pow_ui(&x, 35, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf());
        assert!(flags().contains(ExceptionFlags::OVERFLOW));
        set_emax(DEFAULT_EMAX).unwrap();
        set_emin(DEFAULT_EMIN).unwrap();
        clear_flags();
    }

    #[test]
    fn test_pow_negative_exponent_range() {
        let mut r = BigFloat::new(10).unwrap();

        // |x| > 1 with a huge negative exponent is tiny
        let x = BigFloat::from_f64(1.5, 10).unwrap();
        clear_flags();
        let t = r.pow_si(&x, i64::MIN, RoundingMode::ToEven).unwrap();
        assert!(r.is_zero() && r.is_sign_positive());
        assert!(t < 0);
        assert!(flags().contains(ExceptionFlags::UNDERFLOW));
        assert!(!flags().contains(ExceptionFlags::OVERFLOW));

        let x = BigFloat::from_f64(-1.5, 10).unwrap();
        clear_flags();
        r.pow_si(&x, i64::MIN + 1, RoundingMode::ToEven).unwrap();
        assert!(r.is_zero() && r.is_sign_negative());
        assert!(flags().contains(ExceptionFlags::UNDERFLOW));

        // |x| < 1 with a huge negative exponent is huge
        let x = BigFloat::from_f64(0.75, 10).unwrap();
        clear_flags();
        let t = r.pow_si(&x, i64::MIN, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf() && r.is_sign_positive());
        assert!(t > 0);
        assert!(flags().contains(ExceptionFlags::OVERFLOW));
        assert!(!flags().contains(ExceptionFlags::UNDERFLOW));

        clear_flags();
        r.pow_z(&x, &-(BigInt::one() << 100usize), RoundingMode::ToZero).unwrap();
        assert!(r.is_regular());
        assert!(flags().contains(ExceptionFlags::OVERFLOW));

        // moderate negative exponents stay in range
        let x = BigFloat::from_f64(1.5, 10).unwrap();
        clear_flags();
        let t = r.pow_si(&x, -1000, RoundingMode::ToEven).unwrap();
        assert!(r.is_regular());
        assert!(t != 0);
        assert_eq!(r.e, -584);
        assert!(!flags().contains(ExceptionFlags::UNDERFLOW));
        clear_flags();
    }

    #[test]
    fn test_pow_special() {
        let one = BigFloat::from_f64(1.0, 10).unwrap();
        let two = BigFloat::from_f64(2.0, 10).unwrap();
        let half = BigFloat::from_f64(0.5, 10).unwrap();
        let mut nan = BigFloat::new(10).unwrap();
        nan.set_nan();
        let mut inf = BigFloat::new(10).unwrap();
        inf.set_inf(Sign::Pos);
        let mut ninf = BigFloat::new(10).unwrap();
        ninf.set_inf(Sign::Neg);
        let mut nzero = BigFloat::new(10).unwrap();
        nzero.set_zero(Sign::Neg);
        let three = BigFloat::from_f64(3.0, 10).unwrap();
        let mthree = BigFloat::from_f64(-3.0, 10).unwrap();

        let mut r = BigFloat::new(10).unwrap();

        r.pow(&nan, &nzero, RoundingMode::ToEven).unwrap();
        assert_eq!(r.cmp_ui(1), Some(Ordering::Equal));
        r.pow(&one, &nan, RoundingMode::ToEven).unwrap();
        assert_eq!(r.cmp_ui(1), Some(Ordering::Equal));
        r.pow(&two, &nan, RoundingMode::ToEven).unwrap();
        assert!(r.is_nan());

        r.pow(&half, &inf, RoundingMode::ToEven).unwrap();
        assert!(r.is_zero());
        r.pow(&half, &ninf, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf());
        r.pow(&two, &ninf, RoundingMode::ToEven).unwrap();
        assert!(r.is_zero());
        let mut mone = one.clone();
        mone.neg();
        r.pow(&mone, &inf, RoundingMode::ToEven).unwrap();
        assert_eq!(r.cmp_ui(1), Some(Ordering::Equal));

        r.pow(&ninf, &three, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf() && r.is_sign_negative());
        r.pow(&ninf, &mthree, RoundingMode::ToEven).unwrap();
        assert!(r.is_zero() && r.is_sign_negative());
        r.pow(&ninf, &half, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf() && !r.is_sign_negative());

        clear_flags();
        r.pow(&nzero, &mthree, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf() && r.is_sign_negative());
        assert!(flags().contains(ExceptionFlags::DIVBY0));
        r.pow(&nzero, &half, RoundingMode::ToEven).unwrap();
        assert!(r.is_zero() && !r.is_sign_negative());

        let mtwo = BigFloat::from_f64(-2.0, 10).unwrap();
        r.pow(&mtwo, &half, RoundingMode::ToEven).unwrap();
        assert!(r.is_nan());
        clear_flags();
    }

    #[test]
    fn test_pow_values() {
        let mut r = BigFloat::new(53).unwrap();
        for (a, b) in [(2.5, 0.3), (0.1, -1.7), (7.0, 12.25), (1e-10, 0.01), (1.0001, 1000.5)] {
            let x = BigFloat::from_f64(a, 53).unwrap();
            let y = BigFloat::from_f64(b, 53).unwrap();
            r.pow(&x, &y, RoundingMode::ToEven).unwrap();
            let e = a.powf(b);
            assert!((r.get_d(RoundingMode::ToEven) - e).abs() <= e * 1e-14, "{} {}", a, b);
        }

        // integer exponents go through the exact integer power
        let x = BigFloat::from_f64(-2.0, 53).unwrap();
        let y = BigFloat::from_f64(-3.0, 53).unwrap();
        assert_eq!(r.pow(&x, &y, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_d(-0.125), Some(Ordering::Equal));

        let mut r = BigFloat::new(20).unwrap();
        assert_eq!(r.ui_pow(10, &BigFloat::from_f64(3.0, 10).unwrap(), RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_ui(1000), Some(Ordering::Equal));
    }

    #[test]
    fn test_pow_exact() {
        let mut r = BigFloat::new(20).unwrap();

        // 4^0.5 = 2, 8^(2/3) is not dyadic in y, 2^-2.5 is not exact
        let x = BigFloat::from_f64(4.0, 10).unwrap();
        let y = BigFloat::from_f64(0.5, 10).unwrap();
        assert_eq!(r.pow(&x, &y, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_ui(2), Some(Ordering::Equal));

        // (9/16)^1.5 = 27/64
        let x = BigFloat::from_f64(0.5625, 10).unwrap();
        let y = BigFloat::from_f64(1.5, 10).unwrap();
        assert_eq!(r.pow(&x, &y, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_d(27.0 / 64.0), Some(Ordering::Equal));

        // 2^(-0.75 × 4) at 2^-0.75 is not exact
        let x = BigFloat::from_f64(16.0, 10).unwrap();
        let y = BigFloat::from_f64(-0.75, 10).unwrap();
        assert_eq!(r.pow(&x, &y, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_d(0.125), Some(Ordering::Equal));

        let x = BigFloat::from_f64(2.0, 10).unwrap();
        let y = BigFloat::from_f64(-2.5, 10).unwrap();
        assert!(r.pow(&x, &y, RoundingMode::ToEven).unwrap() != 0);
        let e = 2f64.powf(-2.5);
        assert!((r.get_d(RoundingMode::ToEven) - e).abs() <= e * 1e-6);
    }

    #[test]
    fn test_pow_near_one() {
        let mut r = BigFloat::new(10).unwrap();
        let x = BigFloat::from_f64(3.0, 10).unwrap();
        let mut y = BigFloat::new(10).unwrap();
        y.set_si_2exp(-1, -200, RoundingMode::ToEven);
        assert_eq!(r.pow(&x, &y, RoundingMode::ToEven).unwrap(), 1);
        assert_eq!(r.cmp_ui(1), Some(Ordering::Equal));
        assert_eq!(r.pow(&x, &y, RoundingMode::Down).unwrap(), -1);
        assert!(r.cmp_ui(1) == Some(Ordering::Less));

        // a huge odd integer exponent of a negative number close to -1
        let mut x = BigFloat::new(300).unwrap();
        x.set_si(-1, RoundingMode::ToEven);
        let mut t = BigFloat::new(300).unwrap();
        t.set_si_2exp(-1, -280, RoundingMode::ToEven);
        let mut x2 = BigFloat::new(300).unwrap();
        x2.add(&x, &t, RoundingMode::ToEven);
        let mut y = BigFloat::new(80).unwrap();
        y.set_ui_2exp(1, 70, RoundingMode::ToEven);
        let mut y2 = BigFloat::new(80).unwrap();
        y2.add_ui(&y, 1, RoundingMode::ToEven);
        assert!(is_odd_integer(&y2));
        assert_eq!(r.pow(&x2, &y2, RoundingMode::ToZero).unwrap(), 1);
        assert_eq!(r.cmp_si(-1), Some(Ordering::Equal));
    }

    #[test]
    fn test_pow_range() {
        let mut r = BigFloat::new(10).unwrap();
        let x = BigFloat::from_f64(10.0, 10).unwrap();

        clear_flags();
        let mut yy = BigFloat::new(60).unwrap();
        yy.set_d(1e12 + 0.5, RoundingMode::ToEven);
        r.pow(&x, &yy, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf());
        assert!(flags().contains(ExceptionFlags::OVERFLOW));

        clear_flags();
        yy.neg();
        r.pow(&x, &yy, RoundingMode::ToEven).unwrap();
        assert!(r.is_zero());
        assert!(flags().contains(ExceptionFlags::UNDERFLOW));

        clear_flags();
        yy.set_ui_2exp(3, 200, RoundingMode::ToEven);
        r.pow(&x, &yy, RoundingMode::ToZero).unwrap();
        assert!(r.is_regular());
        assert!(flags().contains(ExceptionFlags::OVERFLOW));
        clear_flags();
    }
}
