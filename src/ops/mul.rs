//! Multiplication.

use crate::common::util::words_to_biguint;
use crate::defs::{RoundingMode, Sign, WORD_BIT_SIZE};
use crate::num::{BigFloat, Kind};

impl BigFloat {
    /// Sets `self` to `b × c` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// The product of zero and infinity is NaN.
    pub fn mul(&mut self, b: &Self, c: &Self, rm: RoundingMode) -> i32 {
        let s = if b.s == c.s { Sign::Pos } else { Sign::Neg };
        match (b.kind, c.kind) {
            (Kind::Nan, _) | (_, Kind::Nan) | (Kind::Inf, Kind::Zero) | (Kind::Zero, Kind::Inf) => {
                self.set_nan();
                0
            }
            (Kind::Inf, _) | (_, Kind::Inf) => {
                self.set_inf(s);
                0
            }
            (Kind::Zero, _) | (_, Kind::Zero) => {
                self.set_zero(s);
                0
            }
            _ => {
                let bl = b.e as i128 - (b.m.len() * WORD_BIT_SIZE) as i128;
                let cl = c.e as i128 - (c.m.len() * WORD_BIT_SIZE) as i128;
                let prod = if core::ptr::eq(b, c) {
                    let n = words_to_biguint(&b.m);
                    &n * &n
                } else {
                    words_to_biguint(&b.m) * words_to_biguint(&c.m)
                };
                self.set_natural(&prod, bl + cl, false, s, rm)
            }
        }
    }

    /// Sets `self` to `x²` rounded using the rounding mode `rm`.
    pub fn sqr(&mut self, x: &Self, rm: RoundingMode) -> i32 {
        self.mul(x, x, rm)
    }

    /// Sets `self` to `x × u` rounded using the rounding mode `rm`.
    pub fn mul_ui(&mut self, x: &Self, u: u64, rm: RoundingMode) -> i32 {
        self.mul(x, &BigFloat::exact_ui(u), rm)
    }

    /// Sets `self` to `x × i` rounded using the rounding mode `rm`.
    pub fn mul_si(&mut self, x: &Self, i: i64, rm: RoundingMode) -> i32 {
        self.mul(x, &BigFloat::exact_si(i), rm)
    }

    /// Sets `self` to `x × f` rounded using the rounding mode `rm`.
    pub fn mul_d(&mut self, x: &Self, f: f64, rm: RoundingMode) -> i32 {
        self.mul(x, &BigFloat::exact_d(f), rm)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::common::util::rand_p;
    use crate::defs::{DEFAULT_EMAX, DEFAULT_EMIN};
    use crate::flags::{clear_flags, flags, set_emax, set_emin, ExceptionFlags};
    use num_bigint::BigInt;

    fn ref_mul(b: &BigFloat, c: &BigFloat, p: usize, rm: RoundingMode) -> (BigFloat, i32) {
        let (bm, be) = b.get_z_2exp();
        let (cm, ce) = c.get_z_2exp();
        let z: BigInt = bm * cm;
        let mut r = BigFloat::new(p).unwrap();
        let t = r.set_z_2exp(&z, be + ce, rm);
        (r, t)
    }

    #[test]
    fn test_mul_random() {
        for _ in 0..1000 {
            let b = BigFloat::random_normal(rand_p(), -100, 100).unwrap();
            let c = BigFloat::random_normal(rand_p(), -100, 100).unwrap();
            let p = rand_p();
            for rm in RoundingMode::DIRECTED_AND_NEAREST {
                let mut r = BigFloat::new(p).unwrap();
                let t = r.mul(&b, &c, rm);
                let (e, te) = ref_mul(&b, &c, p, rm);
                assert!(r == e);
                assert_eq!(t.signum(), te.signum());

                let t = r.sqr(&b, rm);
                let (e, te) = ref_mul(&b, &b, p, rm);
                assert!(r == e);
                assert_eq!(t.signum(), te.signum());
            }
        }
    }

    #[test]
    fn test_mul_special() {
        let mut r = BigFloat::new(20).unwrap();
        let mut inf = BigFloat::new(20).unwrap();
        inf.set_inf(Sign::Neg);
        let mut z = BigFloat::new(20).unwrap();
        z.set_zero(Sign::Pos);
        let three = BigFloat::from_i64(-3, 20).unwrap();

        clear_flags();
        assert_eq!(r.mul(&inf, &z, RoundingMode::ToEven), 0);
        assert!(r.is_nan());
        assert!(flags().contains(ExceptionFlags::INVALID));

        r.mul(&inf, &three, RoundingMode::ToEven);
        assert!(r.is_inf() && !r.is_sign_negative());
        r.mul(&z, &three, RoundingMode::ToEven);
        assert!(r.is_zero() && r.is_sign_negative());

        assert_eq!(r.mul_si(&three, -7, RoundingMode::ToEven), 0);
        assert_eq!(r.cmp_ui(21), Some(core::cmp::Ordering::Equal));
        assert_eq!(r.mul_d(&three, 0.5, RoundingMode::ToEven), 0);
        assert_eq!(r.cmp_d(-1.5), Some(core::cmp::Ordering::Equal));
        r.mul_d(&three, f64::NAN, RoundingMode::ToEven);
        assert!(r.is_nan());

        // 3 × 3 = 9 does not fit 2 bits
        let mut r2 = BigFloat::new(2).unwrap();
        assert!(r2.mul_ui(&BigFloat::from_u64(3, 2).unwrap(), 3, RoundingMode::ToEven) < 0);
        assert_eq!(r2.cmp_ui(8), Some(core::cmp::Ordering::Equal));
        clear_flags();
    }

    #[test]
    fn test_mul_range() {
        set_emax(100).unwrap();
        set_emin(-100).unwrap();
        clear_flags();

        let mut x = BigFloat::new(10).unwrap();
        x.set_ui_2exp(1, 60, RoundingMode::ToEven);
        let mut r = BigFloat::new(10).unwrap();
        assert_eq!(r.sqr(&x, RoundingMode::Up), 1);
        assert!(r.is_inf());
        assert!(flags().contains(ExceptionFlags::OVERFLOW | ExceptionFlags::INEXACT));
        assert_eq!(r.sqr(&x, RoundingMode::ToZero), -1);
        assert!(r.is_regular() && r.exponent() == Some(100));

        clear_flags();
        x.set_si_2exp(-1, -60, RoundingMode::ToEven);
        assert_eq!(r.mul(&x, &x, RoundingMode::Up), 1);
        assert_eq!(r.exponent(), Some(-100));
        assert!(flags().contains(ExceptionFlags::UNDERFLOW));

        set_emax(DEFAULT_EMAX).unwrap();
        set_emin(DEFAULT_EMIN).unwrap();
        clear_flags();
    }
}
