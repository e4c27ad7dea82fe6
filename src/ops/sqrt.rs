//! Square root and reciprocal square root.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::common::util::words_to_biguint;
use crate::defs::{RoundingMode, Sign, WORD_BIT_SIZE};
use crate::flags::{raise, ExceptionFlags};
use crate::num::{BigFloat, Kind};

impl BigFloat {
    /// Sets `self` to the square root of `x` rounded using the rounding mode `rm`.
    /// Returns the ternary value.
    ///
    /// The square root of a negative number is NaN, and the square root of `-0` is `-0`.
    pub fn sqrt(&mut self, x: &Self, rm: RoundingMode) -> i32 {
        match x.kind {
            Kind::Nan => {
                self.set_nan();
                0
            }
            Kind::Zero => {
                self.set_zero(x.s);
                0
            }
            _ if x.s.is_negative() => {
                self.set_nan();
                0
            }
            Kind::Inf => {
                self.set_inf(Sign::Pos);
                0
            }
            Kind::Regular => {
                let (n, l) = x.significand_and_lsb();

                // the root must have at least p + 2 bits, and the exponent must be even
                let mut sh = (2 * (self.p + 2)).saturating_sub(n.bits() as usize);
                if (l - sh as i128) % 2 != 0 {
                    sh += 1;
                }
                let m = n << sh;
                let r = m.sqrt();
                let exact = &r * &r == m;

                self.set_natural(&r, (l - sh as i128) / 2, !exact, Sign::Pos, rm)
            }
        }
    }

    /// Sets `self` to `1/sqrt(x)` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// The result is `+Inf` for both signed zeros, and the division by zero flag is raised.
    /// The result is `+0` for `+Inf`, and NaN for negative numbers.
    pub fn rec_sqrt(&mut self, x: &Self, rm: RoundingMode) -> i32 {
        match x.kind {
            Kind::Nan => {
                self.set_nan();
                0
            }
            Kind::Zero => {
                raise(ExceptionFlags::DIVBY0);
                self.set_inf(Sign::Pos);
                0
            }
            _ if x.s.is_negative() => {
                self.set_nan();
                0
            }
            Kind::Inf => {
                self.set_zero(Sign::Pos);
                0
            }
            Kind::Regular => {
                let (n, l) = x.significand_and_lsb();

                // x = n × 2^l with even l
                let (n, l) = if l % 2 != 0 { (n << 1usize, l - 1) } else { (n, l) };

                // floor(sqrt(floor(a))) = floor(sqrt(a))
                let k = self.p + 3 + (n.bits() as usize + 1) / 2;
                let (q, r) = (BigUint::one() << (2 * k)).div_rem(&n);
                let root = q.sqrt();
                let exact = r.is_zero() && &root * &root == q;

                self.set_natural(&root, -(k as i128) - l / 2, !exact, Sign::Pos, rm)
            }
        }
    }

    /// Returns the significand words as an integer `n` and the weight `l` of its last bit,
    /// so that the magnitude equals `n × 2^l`.
    pub(crate) fn significand_and_lsb(&self) -> (BigUint, i128) {
        let n = words_to_biguint(&self.m);
        let l = self.e as i128 - (self.m.len() * WORD_BIT_SIZE) as i128;
        (n, l)
    }
}

#[cfg(test)]
pub(crate) mod tests {

    use super::*;
    use crate::common::util::rand_p;
    use crate::flags::{clear_flags, flags};
    use core::cmp::Ordering;

    /// Checks that `r` is `f^-1(x)` correctly rounded with the ternary value `t`, where `f` is
    /// increasing, and `f(v)` is computed exactly by `f` for numbers of precision `p + 1`.
    pub(crate) fn check_inverse<F>(r: &BigFloat, t: i32, x: &BigFloat, rm: RoundingMode, f: F)
    where
        F: Fn(&BigFloat) -> BigFloat,
    {
        let p = r.precision();
        let fr = f(r);
        let o = fr.cmp(x).unwrap();
        assert_eq!(t.signum(), o as i32, "ternary of {:?} for {:?}", r, x);

        let mut hi = BigFloat::new(p + 1).unwrap();
        hi.set(r, RoundingMode::ToEven);
        hi.nextabove();
        hi.nextabove();
        let mut lo = BigFloat::new(p + 1).unwrap();
        lo.set(r, RoundingMode::ToEven);
        lo.nextbelow();
        lo.nextbelow();
        if lo.is_zero() {
            lo.set_zero(Sign::Pos);
        }

        match rm {
            RoundingMode::ToZero | RoundingMode::Down => {
                assert!(t <= 0);
                assert!(f(&hi).cmp(x) == Some(Ordering::Greater));
            }
            RoundingMode::FromZero | RoundingMode::Up => {
                assert!(t >= 0);
                assert!(lo.is_zero() || f(&lo).cmp(x) == Some(Ordering::Less));
            }
            _ => {
                // the midpoints around r enclose the exact value
                let mut m1 = hi.clone();
                m1.nextbelow();
                assert!(f(&m1).cmp(x) != Some(Ordering::Less));
                let mut m0 = lo.clone();
                m0.nextabove();
                assert!(f(&m0).cmp(x) != Some(Ordering::Greater));
            }
        }
    }

    fn sqr_exact(v: &BigFloat) -> BigFloat {
        let mut r = BigFloat::new(2 * v.precision()).unwrap();
        assert_eq!(r.sqr(v, RoundingMode::ToEven), 0);
        r
    }

    #[test]
    fn test_sqrt_random() {
        for _ in 0..1000 {
            let mut x = BigFloat::random_normal(rand_p(), -200, 200).unwrap();
            x.abs();
            let p = rand_p();
            for rm in RoundingMode::DIRECTED_AND_NEAREST {
                let mut r = BigFloat::new(p).unwrap();
                let t = r.sqrt(&x, rm);
                check_inverse(&r, t, &x, rm, sqr_exact);
            }
        }
    }

    #[test]
    fn test_sqrt_of_square() {
        for _ in 0..1000 {
            let p = rand_p();
            let x = BigFloat::random_normal(p, -200, 200).unwrap();
            let x2 = sqr_exact(&x);
            for rm in RoundingMode::DIRECTED_AND_NEAREST {
                let mut r = BigFloat::new(p).unwrap();
                assert_eq!(r.sqrt(&x2, rm), 0);
                let mut ax = x.clone();
                ax.abs();
                assert!(r == ax);
            }
        }
    }

    #[test]
    fn test_sqrt_special() {
        let mut r = BigFloat::new(10).unwrap();
        let mut x = BigFloat::new(10).unwrap();

        clear_flags();
        x.set_zero(Sign::Neg);
        assert_eq!(r.sqrt(&x, RoundingMode::ToEven), 0);
        assert!(r.is_zero() && r.is_sign_negative());
        assert!(flags().is_empty());

        x.set_si(-4, RoundingMode::ToEven);
        r.sqrt(&x, RoundingMode::ToEven);
        assert!(r.is_nan());
        assert!(flags().contains(ExceptionFlags::INVALID));

        x.set_inf(Sign::Pos);
        r.sqrt(&x, RoundingMode::ToEven);
        assert!(r.is_inf());

        // sqrt(2) = 1.0110101000001...
        x.set_ui(2, RoundingMode::ToEven);
        assert!(r.sqrt(&x, RoundingMode::ToEven) < 0);
        let mut e = BigFloat::new(10).unwrap();
        e.set_ui_2exp(0b1011010100, -9, RoundingMode::ToEven);
        assert!(r == e);
        clear_flags();
    }

    #[test]
    fn test_rec_sqrt() {
        let mut r = BigFloat::new(30).unwrap();
        let mut x = BigFloat::new(30).unwrap();

        clear_flags();
        x.set_zero(Sign::Neg);
        r.rec_sqrt(&x, RoundingMode::ToEven);
        assert!(r.is_inf() && !r.is_sign_negative());
        assert!(flags().contains(ExceptionFlags::DIVBY0));
        x.set_inf(Sign::Pos);
        r.rec_sqrt(&x, RoundingMode::ToEven);
        assert!(r.is_zero() && !r.is_sign_negative());

        x.set_ui_2exp(1, -6, RoundingMode::ToEven);
        assert_eq!(r.rec_sqrt(&x, RoundingMode::ToEven), 0);
        assert_eq!(r.cmp_ui(8), Some(Ordering::Equal));
        x.set_ui_2exp(1, 7, RoundingMode::ToEven);
        assert!(r.rec_sqrt(&x, RoundingMode::Up) > 0);

        // 1/sqrt(x) = y iff 1/y² = x: check with y increasing in 1/x
        for _ in 0..300 {
            let mut x = BigFloat::random_normal(rand_p(), -100, 100).unwrap();
            x.abs();
            let p = rand_p();
            for rm in RoundingMode::DIRECTED_AND_NEAREST {
                let mut r = BigFloat::new(p).unwrap();
                let t = r.rec_sqrt(&x, rm);
                // r ≈ 1/sqrt(x) <=> 1/r² ≈ x; compare r² × x with 1 instead
                let mut r2 = BigFloat::new(2 * p).unwrap();
                r2.sqr(&r, RoundingMode::ToEven);
                let mut prod = BigFloat::new(2 * p + x.precision()).unwrap();
                assert_eq!(prod.mul(&r2, &x, RoundingMode::ToEven), 0);
                assert_eq!(t.signum(), prod.cmp_ui(1).unwrap() as i32);
            }
        }
        clear_flags();
    }
}
