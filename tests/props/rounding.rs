//! Rounding of random values.

use core::cmp::Ordering;

use crfloat::{can_round_raw, clear_flags, round_p, BigFloat, Exponent, RoundingMode, Sign, Word, WORD_BIT_SIZE};
use rand::random;

fn rand_p() -> usize {
    random::<usize>() % 200 + 1
}

fn rand_rm() -> RoundingMode {
    RoundingMode::DIRECTED_AND_NEAREST[random::<usize>() % 5]
}

#[test]
fn idempotent_rounding() {
    for _ in 0..1000 {
        let p = rand_p();
        let x = BigFloat::random_normal(p, -100, 100).unwrap();
        for rm in RoundingMode::DIRECTED_AND_NEAREST {
            let (y, t) = BigFloat::with_val(&x, p, rm).unwrap();
            assert_eq!(t, 0);
            assert!(x == y);

            let mut z = x.clone();
            assert_eq!(z.prec_round(p, rm).unwrap(), 0);
            assert!(x == z);
        }
    }
}

#[test]
fn round_p_agrees_with_can_round_raw() {
    for _ in 0..10000 {
        let n = random::<usize>() % 8 + 2;
        let mut buf: Vec<Word> = (0..n).map(|_| random::<Word>()).collect();
        buf[n - 1] |= 1 << (WORD_BIT_SIZE - 1);

        // runs of zeros and ones are the interesting patterns
        if random::<bool>() {
            let w = if random::<bool>() { 0 } else { Word::MAX };
            let k = random::<usize>() % (n - 1);
            buf[k..n - 1].iter_mut().for_each(|v| *v = w);
        }

        let p = random::<usize>() % ((n - 1) * WORD_BIT_SIZE) + 1;
        let err = (p + random::<usize>() % (n * WORD_BIT_SIZE - p) + 1) as Exponent;
        assert_eq!(
            round_p(&buf, err, p),
            can_round_raw(&buf, Sign::Pos, err, RoundingMode::ToEven, RoundingMode::ToZero, p),
            "{:?} {} {}",
            buf,
            err,
            p
        );
    }
}

#[test]
fn monotone_functions() {
    for _ in 0..100 {
        let p = rand_p();
        let rm = rand_rm();
        let mut x = BigFloat::random_normal(p, -4, 4).unwrap();
        let mut y = BigFloat::random_normal(p, -4, 4).unwrap();
        if x > y {
            core::mem::swap(&mut x, &mut y);
        }

        let mut a = BigFloat::new(p).unwrap();
        let mut b = BigFloat::new(p).unwrap();

        a.exp(&x, rm).unwrap();
        b.exp(&y, rm).unwrap();
        assert!(a <= b);

        x.abs();
        y.abs();
        if x > y {
            core::mem::swap(&mut x, &mut y);
        }

        a.sqrt(&x, rm);
        b.sqrt(&y, rm);
        assert!(a <= b);

        let mut z = BigFloat::random_normal(20, -2, 3).unwrap();
        z.abs();
        a.pow(&x, &z, rm).unwrap();
        b.pow(&y, &z, rm).unwrap();
        assert!(a <= b, "{} {} {} {:?}", x, y, z, rm);

        z.neg();
        a.pow(&x, &z, rm).unwrap();
        b.pow(&y, &z, rm).unwrap();
        assert!(a >= b, "{} {} {} {:?}", x, y, z, rm);
    }
    clear_flags();
}

#[test]
fn sqrt_of_square() {
    for _ in 0..1000 {
        let p = rand_p();
        let x = BigFloat::random_normal(p, -100, 100).unwrap();
        for rm in RoundingMode::DIRECTED_AND_NEAREST {
            let mut sq = BigFloat::new(2 * p).unwrap();
            assert_eq!(sq.sqr(&x, rm), 0);

            let mut r = BigFloat::new(p).unwrap();
            assert_eq!(r.sqrt(&sq, rm), 0);
            assert_eq!(r.cmp_abs(&x), Some(Ordering::Equal));
            assert!(!r.is_sign_negative());
        }
    }
}

#[test]
fn pow2_is_square() {
    for _ in 0..1000 {
        let p = rand_p();
        let x = BigFloat::random_normal(p, -100, 100).unwrap();
        let q = rand_p();
        for rm in RoundingMode::DIRECTED_AND_NEAREST {
            let mut a = BigFloat::new(q).unwrap();
            let mut b = BigFloat::new(q).unwrap();
            let ta = a.pow_ui(&x, 2, rm).unwrap();
            let tb = b.sqr(&x, rm);
            assert!(a == b);
            assert_eq!(ta.signum(), tb.signum());
        }
    }
    clear_flags();
}
