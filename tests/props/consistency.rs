//! Boundary cases of the power family, and saturation at the ends of the exponent range.

use core::cmp::Ordering;

use crfloat::{
    clear_flags, flags, set_emax, set_emin, BigFloat, ExceptionFlags, RoundingMode, Sign, DEFAULT_EMAX,
    DEFAULT_EMIN,
};

fn nan() -> BigFloat {
    BigFloat::new(10).unwrap()
}

#[test]
fn integer_power_of_zero_degree() {
    let mut r = BigFloat::new(10).unwrap();
    let mut inf = BigFloat::new(10).unwrap();
    inf.set_inf(Sign::Neg);

    for x in [nan(), inf, BigFloat::from_f64(-2.5, 10).unwrap()] {
        for rm in RoundingMode::DIRECTED_AND_NEAREST {
            assert_eq!(r.pow_ui(&x, 0, rm).unwrap(), 0);
            assert_eq!(r.cmp_ui(1), Some(Ordering::Equal));
            assert_eq!(r.pow_si(&x, 0, rm).unwrap(), 0);
            assert_eq!(r.cmp_ui(1), Some(Ordering::Equal));
        }
    }
    clear_flags();
}

#[test]
fn compound_boundaries() {
    let mut r = BigFloat::new(10).unwrap();
    let rm = RoundingMode::ToEven;

    for x in [nan(), BigFloat::from_f64(-1.0, 10).unwrap(), BigFloat::from_f64(3.75, 10).unwrap()] {
        assert_eq!(r.compound_si(&x, 0, rm).unwrap(), 0);
        assert_eq!(r.cmp_ui(1), Some(Ordering::Equal));
    }

    let m1 = BigFloat::from_f64(-1.0, 10).unwrap();
    clear_flags();
    assert_eq!(r.compound_si(&m1, -3, rm).unwrap(), 0);
    assert!(r.is_inf() && !r.is_sign_negative());
    assert_eq!(flags(), ExceptionFlags::DIVBY0);

    clear_flags();
    assert_eq!(r.compound_si(&m1, 3, rm).unwrap(), 0);
    assert!(r.is_zero() && !r.is_sign_negative());
    assert!(flags().is_empty());

    let y = BigFloat::from_f64(-3.0, 10).unwrap();
    assert_eq!(r.compound(&m1, &y, rm).unwrap(), 0);
    assert!(r.is_inf() && !r.is_sign_negative());

    // below -1
    r.compound_si(&BigFloat::from_f64(-1.5, 10).unwrap(), 2, rm).unwrap();
    assert!(r.is_nan());
    assert!(flags().contains(ExceptionFlags::INVALID));
    clear_flags();
}

#[test]
fn zeroth_root() {
    let mut r = BigFloat::new(10).unwrap();
    for x in [BigFloat::from_f64(4.0, 10).unwrap(), BigFloat::from_f64(-8.0, 10).unwrap(), nan()] {
        assert_eq!(r.rootn_ui(&x, 0, RoundingMode::ToEven).unwrap(), 0);
        assert!(r.is_nan());
        assert_eq!(r.rootn_si(&x, 0, RoundingMode::ToEven).unwrap(), 0);
        assert!(r.is_nan());
    }
    clear_flags();
}

#[test]
fn subtraction_of_a_tiny_value() {
    let one = BigFloat::from_u64(1, 10).unwrap();
    let mut tiny = BigFloat::new(1).unwrap();
    tiny.set_ui_2exp(1, -1000, RoundingMode::ToEven);

    let mut r = BigFloat::new(10).unwrap();
    let t = r.sub(&one, &tiny, RoundingMode::ToZero);
    assert!(t < 0);
    assert_eq!(r.cmp_d(1.0 - 1.0 / 1024.0), Some(Ordering::Equal));

    let t = r.sub(&one, &tiny, RoundingMode::ToEven);
    assert!(t > 0);
    assert_eq!(r.cmp_ui(1), Some(Ordering::Equal));
    clear_flags();
}

// The result of rounding a value outside of the exponent range [-10, 10] to 10 bits.
fn saturation(rm: RoundingMode, s: Sign, overflow: bool) -> (Ordering, i32) {
    use RoundingMode::*;
    let up = match rm {
        ToEven => overflow,
        ToZero => false,
        Up => s == Sign::Pos,
        Down => s == Sign::Neg,
        FromZero => true,
        Faithful => unreachable!(),
    };
    let t = if up { s.to_int() } else { -s.to_int() };
    let o = match (overflow, up) {
        (true, true) => Ordering::Greater,
        (true, false) => Ordering::Equal,
        (false, true) => Ordering::Equal,
        (false, false) => Ordering::Less,
    };
    (o, t)
}

#[test]
fn overflow_and_underflow_thresholds() {
    set_emin(-10).unwrap();
    set_emax(10).unwrap();

    let max = BigFloat::from_f64(1023.0, 10).unwrap();
    let min = BigFloat::from_f64(1.0 / 2048.0, 10).unwrap();
    let mut r = BigFloat::new(10).unwrap();

    for rm in RoundingMode::DIRECTED_AND_NEAREST {
        for s in [Sign::Pos, Sign::Neg] {
            let base = BigFloat::from_i64(3 * s.to_int() as i64, 10).unwrap();

            // the largest finite value is exact, the next one is out of range
            clear_flags();
            assert_eq!(r.pow_ui(&max, 1, rm).unwrap(), 0);
            assert!(flags().is_empty());

            // 3^7 = 2187 > 1023
            clear_flags();
            let t = r.pow_ui(&base, 7, rm).unwrap();
            assert_eq!(flags(), ExceptionFlags::OVERFLOW | ExceptionFlags::INEXACT);
            let (o, tt) = saturation(rm, s, true);
            assert_eq!(t, tt, "{:?} {:?}", rm, s);
            assert_eq!(r.sign(), s);
            if o == Ordering::Greater {
                assert!(r.is_inf());
            } else {
                assert_eq!(r.cmp_abs(&max), Some(Ordering::Equal));
            }

            // 3^-9 < 2^-12, less than a half of the smallest value
            clear_flags();
            let t = r.pow_si(&base, -9, rm).unwrap();
            assert_eq!(flags(), ExceptionFlags::UNDERFLOW | ExceptionFlags::INEXACT);
            let (o, tt) = saturation(rm, s, false);
            assert_eq!(t, tt, "{:?} {:?}", rm, s);
            assert_eq!(r.sign(), s);
            if o == Ordering::Less {
                assert!(r.is_zero());
            } else {
                assert_eq!(r.cmp_abs(&min), Some(Ordering::Equal));
            }
        }
    }

    // rounding up the largest value crosses the boundary
    clear_flags();
    let (r, t) = BigFloat::with_val(&max, 9, RoundingMode::Up).unwrap();
    assert!(r.is_inf() && t > 0);
    let (r, t) = BigFloat::with_val(&max, 9, RoundingMode::Down).unwrap();
    assert!(r.is_regular() && t < 0);

    set_emin(DEFAULT_EMIN).unwrap();
    set_emax(DEFAULT_EMAX).unwrap();
    clear_flags();
}
