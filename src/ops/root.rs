//! Roots of an arbitrary degree.

use core::cmp::Ordering;

use num_bigint::BigUint;
use num_traits::One;

use crate::defs::{Error, Exponent, RoundingMode, Sign};
use crate::flags::{raise, ExceptionFlags, ExpoGuard};
use crate::num::{BigFloat, Kind};
use crate::ops::log::LnArg;
use crate::ops::series::exp_bounds;
use crate::ops::ziv::{near_one_signed, working_prec, ziv, Attempt};

// Degrees up to this value use the exact integer root.
const EXACT_ROOT_MAX_DEGREE: u64 = 100;

impl BigFloat {
    /// Sets `self` to the `k`-th root of `x` rounded using the rounding mode `rm`.
    /// Returns the ternary value.
    ///
    /// The 0-th root is NaN. Even roots of negative numbers are NaN, and `-0` has the
    /// root `+0` for even `k`.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn rootn_ui(&mut self, x: &Self, k: u64, rm: RoundingMode) -> Result<i32, Error> {
        match k {
            0 => {
                self.set_nan();
                return Ok(0);
            }
            1 => return Ok(self.set(x, rm)),
            _ => {}
        }

        let even = k % 2 == 0;
        match x.kind {
            Kind::Nan => {
                self.set_nan();
                return Ok(0);
            }
            Kind::Inf => {
                if x.s.is_negative() && even {
                    self.set_nan();
                } else {
                    self.set_inf(x.s);
                }
                return Ok(0);
            }
            Kind::Zero => {
                self.set_zero(if even { Sign::Pos } else { x.s });
                return Ok(0);
            }
            Kind::Regular => {}
        }

        if x.s.is_negative() && even {
            self.set_nan();
            return Ok(0);
        }

        if x.e == 1 && x.is_power_of_two_raw() {
            return Ok(self.set(x, rm));
        }

        if k > EXACT_ROOT_MAX_DEGREE {
            return self.root_exp_log(x, k, rm);
        }

        Ok(self.root_exact(x, k, rm))
    }

    // k-th root through an integer root of the significand scaled to p + 1 bits of the result.
    fn root_exact(&mut self, x: &Self, k: u64, rm: RoundingMode) -> i32 {
        let (m, e) = x.significand_and_lsb();
        let ki = k as i128;
        let r = e.rem_euclid(ki);

        let mrm = rm.to_magnitude(x.s);
        let n = self.p as i128 + (mrm == RoundingMode::ToEven) as i128;

        // k × (n - 1) + 1 <= bits(m × 2^sh) <= k × n
        let size_m = m.bits() as i128;
        let f = if size_m + r >= ki * n { 0 } else { (ki * n - size_m - r) / ki };
        let sh = ki * f + r;
        let m = m << sh as usize;
        let mut e = e - sh;

        let mut root = m.nth_root(k as u32);
        let mut inexact = root.pow(k as u32) != m;

        let sh = root.bits() as i128 - n;
        if sh > 0 {
            inexact = inexact || (root.trailing_zeros().unwrap_or(0) as i128) < sh;
            root >>= sh as usize;
            e += ki * sh;
        }

        let mut t = 0;
        if inexact {
            let up = match mrm {
                RoundingMode::FromZero => true,
                RoundingMode::ToEven => root.bit(0),
                _ => false,
            };
            if up {
                root += 1u32;
                t = 1;
            } else {
                t = -1;
            }
            raise(ExceptionFlags::INEXACT);
        }

        // the conversion is exact when the root is inexact
        let t2 = self.set_natural(&root, e / ki, false, x.s, rm);
        t * x.s.to_int() + t2
    }

    // exp(ln|x| / k) for large k
    fn root_exp_log(&mut self, x: &Self, k: u64, rm: RoundingMode) -> Result<i32, Error> {
        let guard = ExpoGuard::new();

        let mut ax = x.clone();
        ax.s = Sign::Pos;
        let ln = LnArg::new(&ax)?;

        let kbits = (u64::BITS - 1 - k.leading_zeros()) as Exponent;
        if ln.bits - kbits < -(self.p as Exponent) - 2 {
            let t = near_one_signed(self, ln.is_positive(), x.s, rm);
            return Ok(guard.finish(self, t, rm));
        }

        let p = self.p;
        let arg = |s: usize| ln.bounds(s).div_int(k).rescale(s);
        let w0 = working_prec(p, 10) + ax.e.max(0) as usize;
        let mut tries = 0;

        ziv(self, rm, guard, "rootn_ui", w0, |w| {
            let (b, sh) = exp_bounds(&arg, w);
            let mut a = Attempt::from_bounds(&b, sh)?;

            if tries > 0 {
                // exact roots can not be rounded at any working precision
                let exact = match &a {
                    Attempt::Approx { t, shift, .. } => {
                        let mut z = BigFloat::new(p + 1)?;
                        z.set(t, RoundingMode::ToEven);
                        z.e += *shift as Exponent;
                        let mut zk = BigFloat::new(ax.precision())?;
                        let t = zk.pow_ui(&z, k, RoundingMode::ToEven)?;
                        if t == 0 && zk.cmp(&ax) == Some(Ordering::Equal) {
                            Some(z)
                        } else {
                            None
                        }
                    }
                    _ => None,
                };
                if let Some(z) = exact {
                    log::trace!("rootn_ui: exact root of degree {}", k);
                    a = Attempt::Exact { t: z, shift: 0 };
                }
            }
            tries += 1;

            if x.s.is_negative() {
                if let Attempt::Approx { t, .. } | Attempt::Exact { t, .. } = &mut a {
                    t.neg();
                }
            }
            Ok(a)
        })
    }

    /// Sets `self` to the `k`-th root of `x` rounded using the rounding mode `rm`.
    /// Returns the ternary value.
    ///
    /// For negative `k`, the root of `±0` is an infinity, and the root of `±Inf` is a zero.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn rootn_si(&mut self, x: &Self, k: i64, rm: RoundingMode) -> Result<i32, Error> {
        if k >= 0 {
            return self.rootn_ui(x, k as u64, rm);
        }

        let even = k % 2 == 0;
        match x.kind {
            Kind::Nan => {
                self.set_nan();
                return Ok(0);
            }
            Kind::Inf => {
                if x.s.is_negative() && even {
                    self.set_nan();
                } else {
                    self.set_zero(x.s);
                }
                return Ok(0);
            }
            Kind::Zero => {
                self.set_inf(if even { Sign::Pos } else { x.s });
                return Ok(0);
            }
            Kind::Regular => {}
        }

        if x.s.is_negative() && even {
            self.set_nan();
            return Ok(0);
        }

        if x.e == 1 && x.is_power_of_two_raw() {
            return Ok(self.set(x, rm));
        }

        match k {
            -1 => return Ok(self.ui_div(1, x, rm)),
            -2 => return Ok(self.rec_sqrt(x, rm)),
            _ => {}
        }

        let ku = k.unsigned_abs();
        if x.is_power_of_two_raw() {
            // |x| = 2^(e - 1), the root is exact if k divides e - 1
            let e1 = x.e as i128 - 1;
            if e1 % ku as i128 == 0 {
                return Ok(self.set_natural(&BigUint::one(), -e1 / ku as i128, false, x.s, rm));
            }
        }

        let guard = ExpoGuard::new();
        let w0 = self.p + 10;
        ziv(self, rm, guard, "rootn_si", w0, |w| {
            let mut t = BigFloat::new(w)?;
            t.rootn_ui(x, ku, RoundingMode::Faithful)?;
            let mut r = BigFloat::new(w)?;
            r.ui_div(1, &t, RoundingMode::ToEven);
            // at most 5 ulp
            Ok(Attempt::Approx {
                t: r,
                err: w as Exponent - 3,
                shift: 0,
            })
        })
    }

    /// Sets `self` to the `k`-th root of `x` rounded using the rounding mode `rm`.
    /// Returns the ternary value.
    ///
    /// Unlike `rootn_ui`, the root of `-0` is `-0` for any `k`.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    #[deprecated(note = "use rootn_ui")]
    pub fn root(&mut self, x: &Self, k: u64, rm: RoundingMode) -> Result<i32, Error> {
        if k > 1 && x.is_zero() {
            self.set_zero(x.s);
            return Ok(0);
        }
        self.rootn_ui(x, k, rm)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::common::util::rand_p;
    use crate::ops::sqrt::tests::check_inverse;

    #[test]
    fn test_rootn_special() {
        let mut r = BigFloat::new(20).unwrap();
        let mut x = BigFloat::new(20).unwrap();

        x.set_ui(5, RoundingMode::ToEven);
        r.rootn_ui(&x, 0, RoundingMode::ToEven).unwrap();
        assert!(r.is_nan());

        x.set_inf(Sign::Neg);
        r.rootn_ui(&x, 4, RoundingMode::ToEven).unwrap();
        assert!(r.is_nan());
        r.rootn_ui(&x, 5, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf() && r.is_sign_negative());
        r.rootn_si(&x, -5, RoundingMode::ToEven).unwrap();
        assert!(r.is_zero() && r.is_sign_negative());

        x.set_zero(Sign::Neg);
        r.rootn_ui(&x, 4, RoundingMode::ToEven).unwrap();
        assert!(r.is_zero() && !r.is_sign_negative());
        r.rootn_ui(&x, 3, RoundingMode::ToEven).unwrap();
        assert!(r.is_zero() && r.is_sign_negative());
        r.rootn_si(&x, -4, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf() && !r.is_sign_negative());
        r.rootn_si(&x, -3, RoundingMode::ToEven).unwrap();
        assert!(r.is_inf() && r.is_sign_negative());

        #[allow(deprecated)]
        {
            r.root(&x, 4, RoundingMode::ToEven).unwrap();
            assert!(r.is_zero() && r.is_sign_negative());
            r.root(&x, 0, RoundingMode::ToEven).unwrap();
            assert!(r.is_nan());
        }

        x.set_si(-8, RoundingMode::ToEven);
        r.rootn_ui(&x, 2, RoundingMode::ToEven).unwrap();
        assert!(r.is_nan());
        assert_eq!(r.rootn_ui(&x, 3, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_si(-2), Some(Ordering::Equal));

        x.set_si(-1, RoundingMode::ToEven);
        assert_eq!(r.rootn_si(&x, -7, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_si(-1), Some(Ordering::Equal));
    }

    #[test]
    fn test_rootn_exact() {
        let mut r = BigFloat::new(30).unwrap();
        let mut x = BigFloat::new(30).unwrap();

        x.set_ui(3u64.pow(10), RoundingMode::ToEven);
        assert_eq!(r.rootn_ui(&x, 10, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_ui(3), Some(Ordering::Equal));

        x.set_ui_2exp(1, -28, RoundingMode::ToEven);
        assert_eq!(r.rootn_si(&x, -7, RoundingMode::Down).unwrap(), 0);
        assert_eq!(r.cmp_ui(16), Some(Ordering::Equal));

        // √2 at 1 bit
        let mut r = BigFloat::new(1).unwrap();
        x.set_ui(2, RoundingMode::ToEven);
        assert_eq!(r.rootn_ui(&x, 2, RoundingMode::ToEven).unwrap(), -1);
        assert_eq!(r.cmp_ui(1), Some(Ordering::Equal));

        // 1.5^3 = 3.375 at 2 and 3 bits
        let mut r = BigFloat::new(2).unwrap();
        x.set_d(3.375, RoundingMode::ToEven);
        assert_eq!(r.rootn_ui(&x, 3, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_d(1.5), Some(Ordering::Equal));

        // the root of degree above 100 goes through exp and log
        let mut r = BigFloat::new(10).unwrap();
        x.set_ui_2exp(1, 202, RoundingMode::ToEven);
        assert_eq!(r.rootn_ui(&x, 101, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_ui(4), Some(Ordering::Equal));

        let mut x = BigFloat::new(200).unwrap();
        x.ui_pow_ui(3, 101, RoundingMode::ToEven).unwrap();
        assert_eq!(r.rootn_ui(&x, 101, RoundingMode::ToEven).unwrap(), 0);
        assert_eq!(r.cmp_ui(3), Some(Ordering::Equal));
    }

    #[test]
    fn test_rootn_values() {
        let mut r = BigFloat::new(53).unwrap();
        for (v, k) in [(10.0, 3), (0.3, 5), (1e100, 7), (123.456, 100), (7.0, 1000), (1e-300, 250)] {
            let x = BigFloat::from_f64(v, 53).unwrap();
            r.rootn_ui(&x, k, RoundingMode::ToEven).unwrap();
            let e = v.powf(1.0 / k as f64);
            assert!((r.get_d(RoundingMode::ToEven) - e).abs() <= e * 1e-13, "{} {}", v, k);

            r.rootn_si(&x, -(k as i64), RoundingMode::ToEven).unwrap();
            let e = 1.0 / e;
            assert!((r.get_d(RoundingMode::ToEven) - e).abs() <= e * 1e-13, "{} {}", v, k);
        }

        // close to 1
        let mut r = BigFloat::new(20).unwrap();
        let x = BigFloat::from_f64(3.0, 10).unwrap();
        assert_eq!(r.rootn_ui(&x, 1 << 40, RoundingMode::ToEven).unwrap(), -1);
        assert_eq!(r.cmp_ui(1), Some(Ordering::Equal));
        assert_eq!(r.rootn_ui(&x, 1 << 40, RoundingMode::Up).unwrap(), 1);
        assert_eq!(r.cmp_ui(1), Some(Ordering::Greater));
    }

    #[test]
    fn test_rootn_inverse() {
        // the root of degree k raised to the power k brackets x
        for _ in 0..200 {
            let p = rand_p().min(100);
            let x = BigFloat::random_normal(rand_p(), -50, 50).unwrap();
            let mut ax = x.clone();
            ax.abs();
            let k = rand::random::<u64>() % 7 + 2;
            for rm in RoundingMode::DIRECTED_AND_NEAREST {
                let mut r = BigFloat::new(p).unwrap();
                let t = r.rootn_ui(&ax, k, rm).unwrap();
                check_inverse(&r, t, &ax, rm, |v| {
                    let mut q = BigFloat::new((v.precision() + 1) * k as usize).unwrap();
                    assert_eq!(q.pow_ui(v, k, RoundingMode::ToEven).unwrap(), 0);
                    q
                });
            }
        }
    }
}
