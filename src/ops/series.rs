//! Fixed-point evaluation of the logarithm and the exponential with rigorous bounds.
//!
//! A real number `v` is enclosed by two integers at a scale `s`: `lo <= v × 2^s <= hi`.
//! Every operation rounds the lower bound down and the upper bound up, so an enclosure
//! stays valid at any scale, and a larger scale gives a narrower enclosure.

use num_bigint::{BigInt, BigUint};
use num_integer::{Integer, Roots};
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::ops::consts::ln2_bounds;

/// Enclosure of a real number: `lo <= v × 2^s <= hi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Bounds {
    pub lo: BigInt,
    pub hi: BigInt,
    pub s: usize,
}

#[inline]
fn pow2(k: usize) -> BigInt {
    BigInt::one() << k
}

/// Guard bits absorbing the rounding errors of a series with about `s` terms.
#[inline]
pub(crate) fn guard_bits(s: usize) -> usize {
    (usize::BITS - s.leading_zeros()) as usize + 4
}

/// `floor(a × 2^k)`
pub(crate) fn shl_floor(a: &BigInt, k: i128) -> BigInt {
    if k >= 0 {
        a << k as usize
    } else {
        a.div_floor(&pow2((-k) as usize))
    }
}

/// `ceil(a × 2^k)`
pub(crate) fn shl_ceil(a: &BigInt, k: i128) -> BigInt {
    if k >= 0 {
        a << k as usize
    } else {
        -((-a).div_floor(&pow2((-k) as usize)))
    }
}

#[inline]
fn div_ceil(a: &BigInt, b: &BigInt) -> BigInt {
    -((-a).div_floor(b))
}

impl Bounds {
    /// Exact enclosure of zero.
    pub fn zero(s: usize) -> Self {
        Bounds {
            lo: BigInt::zero(),
            hi: BigInt::zero(),
            s,
        }
    }

    /// Encloses `n × 2^q`.
    pub fn of_dyadic(n: &BigInt, q: i128, s: usize) -> Self {
        let k = q + s as i128;
        Bounds {
            lo: shl_floor(n, k),
            hi: shl_ceil(n, k),
            s,
        }
    }

    pub fn width(&self) -> BigInt {
        &self.hi - &self.lo
    }

    /// The same number enclosed at the scale `s`.
    pub fn rescale(&self, s: usize) -> Self {
        let k = s as i128 - self.s as i128;
        Bounds {
            lo: shl_floor(&self.lo, k),
            hi: shl_ceil(&self.hi, k),
            s,
        }
    }

    pub fn add(&self, o: &Self) -> Self {
        debug_assert_eq!(self.s, o.s);
        Bounds {
            lo: &self.lo + &o.lo,
            hi: &self.hi + &o.hi,
            s: self.s,
        }
    }

    pub fn sub(&self, o: &Self) -> Self {
        debug_assert_eq!(self.s, o.s);
        Bounds {
            lo: &self.lo - &o.hi,
            hi: &self.hi - &o.lo,
            s: self.s,
        }
    }

    pub fn mul_int(&self, k: &BigInt) -> Self {
        let (a, b) = (&self.lo * k, &self.hi * k);
        let (lo, hi) = if k.is_negative() { (b, a) } else { (a, b) };
        Bounds { lo, hi, s: self.s }
    }

    /// Quotient by a positive integer.
    pub fn div_int(&self, k: u64) -> Self {
        let k = BigInt::from(k);
        Bounds {
            lo: self.lo.div_floor(&k),
            hi: div_ceil(&self.hi, &k),
            s: self.s,
        }
    }

    /// Product at the scale of `self`.
    pub fn mul(&self, o: &Self) -> Self {
        let c = [&self.lo * &o.lo, &self.lo * &o.hi, &self.hi * &o.lo, &self.hi * &o.hi];
        let (mut min, mut max) = (&c[0], &c[0]);
        for v in c.iter().skip(1) {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        let k = -(o.s as i128);
        Bounds {
            lo: shl_floor(min, k),
            hi: shl_ceil(max, k),
            s: self.s,
        }
    }

    /// Quotient at the scale of `self`. None if the divisor encloses zero.
    pub fn div(&self, o: &Self) -> Option<Self> {
        if !o.lo.is_positive() && !o.hi.is_negative() {
            return None;
        }
        let n = [&self.lo << o.s, &self.hi << o.s];
        let d = [&o.lo, &o.hi];
        let mut lo: Option<BigInt> = None;
        let mut hi: Option<BigInt> = None;
        for a in n.iter() {
            for b in d.iter() {
                let f = a.div_floor(b);
                let c = div_ceil(a, b);
                if lo.as_ref().map_or(true, |v| &f < v) {
                    lo = Some(f);
                }
                if hi.as_ref().map_or(true, |v| &c > v) {
                    hi = Some(c);
                }
            }
        }
        Some(Bounds {
            lo: lo?,
            hi: hi?,
            s: self.s,
        })
    }
}

/// Bound of `atanh(a / 2^s) × 2^s` for `0 <= a <= 2^s / 3`.
/// The terms of the series decrease at least nine times, which bounds the remainder.
fn atanh_point(a: &BigInt, s: usize, up: bool) -> BigInt {
    debug_assert!(!a.is_negative());
    let a2 = a * a;
    let sh = -2 * s as i128;
    let one = BigInt::one();
    let mut x = a.clone();
    let mut sum = BigInt::zero();
    let mut i = 0u64;
    loop {
        if up && x <= one {
            // the remainder is less than 9/8 × x
            return sum + 2u32;
        }
        if !up && x.is_zero() {
            return sum;
        }
        let d = BigInt::from(2 * i + 1);
        if up {
            sum += div_ceil(&x, &d);
            x = shl_ceil(&(&x * &a2), sh);
        } else {
            sum += x.div_floor(&d);
            x = shl_floor(&(&x * &a2), sh);
        }
        i += 1;
    }
}

/// atanh is odd and increasing.
fn atanh_bounds(z: &Bounds) -> Bounds {
    let f = |a: &BigInt, up: bool| {
        if a.is_negative() {
            -atanh_point(&-a, z.s, !up)
        } else {
            atanh_point(a, z.s, up)
        }
    };
    Bounds {
        lo: f(&z.lo, false),
        hi: f(&z.hi, true),
        s: z.s,
    }
}

/// Encloses `ln(1 + d)` for `d = n × 2^q` with `|d| <= 1/2`.
///
/// The scale of the result exceeds `s` by the number of leading zero bits of `d`,
/// so the enclosure keeps about `s` significant bits for small `d`.
pub(crate) fn ln1p_small(n: &BigInt, q: i128, s: usize) -> Bounds {
    if n.is_zero() {
        return Bounds::zero(s);
    }
    let ed = n.bits() as i128 + q;
    debug_assert!(ed <= 0);
    let s = s + (-ed) as usize + guard_bits(s);

    let d = Bounds::of_dyadic(n, q, s);
    let two = pow2(s + 1);

    // z = d / (2 + d) increases with d, and |z| <= 1/3
    let z = Bounds {
        lo: (&d.lo << s).div_floor(&(&two + &d.lo)),
        hi: div_ceil(&(&d.hi << s), &(&two + &d.hi)),
        s,
    };

    // ln(1 + d) = 2 atanh(z)
    let r = atanh_bounds(&z);
    Bounds {
        lo: r.lo << 1usize,
        hi: r.hi << 1usize,
        s,
    }
}

/// Encloses `ln(n × 2^q)` for `n > 0`.
/// The scale of the result is at least `s`, and larger if the logarithm is close to zero.
pub(crate) fn ln_dyadic(n: &BigUint, q: i128, s: usize) -> Bounds {
    debug_assert!(!n.is_zero());
    let b = n.bits() as usize;

    // n × 2^q = (1 + d) × 2^k with -1/4 <= d < 1/2
    let w = if b >= 2 && (n >> (b - 2)) == BigUint::from(3u8) {
        b
    } else {
        b - 1
    };
    let k = w as i128 + q;
    let d = BigInt::from(n.clone()) - pow2(w);

    let r = ln1p_small(&d, -(w as i128), s);
    if k == 0 {
        r
    } else {
        r.add(&ln2_multiple(&BigInt::from(k), r.s))
    }
}

/// Encloses `k × ln(2)` at the scale `s`. The product is formed at a scale larger by the
/// bit length of `k`, so the width stays a few units whatever the magnitude of `k`.
fn ln2_multiple(k: &BigInt, s: usize) -> Bounds {
    ln2_bounds(s + k.bits() as usize).mul_int(k).rescale(s)
}

/// Bound of `exp(a / 2^s) × 2^t`: the argument is divided by `2^k`, the Taylor series is summed,
/// and the sum is squared `k` times. Requires `|a / 2^(s + k)| <= 1/2`.
fn exp_point(a: &BigInt, s: usize, t: usize, k: usize, up: bool) -> BigInt {
    if a.is_negative() {
        // exp(-v) = 1 / exp(v)
        let d = exp_point(&-a, s, t, k, !up);
        let num = pow2(2 * t);
        return if up { div_ceil(&num, &d) } else { num.div_floor(&d) };
    }

    let u = a << (t - s - k);
    let one = BigInt::one();
    let mut sum = pow2(t);
    let mut term = sum.clone();
    let mut i = 1u64;
    loop {
        let num = &term * &u;
        let den = BigInt::from(i) << t;
        if up {
            term = div_ceil(&num, &den);
            if term <= one {
                // the terms at least halve, so the remainder is at most 2 × term
                sum += 2u32;
                break;
            }
        } else {
            term = num.div_floor(&den);
            if term.is_zero() {
                break;
            }
        }
        sum += &term;
        i += 1;
    }

    let sh = -(t as i128);
    for _ in 0..k {
        let sq = &sum * &sum;
        sum = if up { shl_ceil(&sq, sh) } else { shl_floor(&sq, sh) };
    }
    sum
}

/// Encloses `exp(v) × 2^-n` and returns the enclosure together with `n`.
/// `arg` returns an enclosure of `v` at a requested scale; `|v|` must be less than `2^100`.
pub(crate) fn exp_bounds<F>(arg: F, s: usize) -> (Bounds, i128)
where
    F: Fn(usize) -> Bounds,
{
    // n = round(v / ln(2)) from a coarse enclosure
    let coarse = arg(WORD_SCALE);
    let l2 = ln2_bounds(WORD_SCALE);
    let n = (&coarse.lo * 2u32 + &l2.lo).div_floor(&(&l2.lo * 2u32));
    debug_assert!(n.bits() < 110);

    let s = s + n.bits() as usize + guard_bits(s);
    let x = arg(s);
    let r = x.sub(&ln2_multiple(&n, s));

    let k = s.sqrt() / 2 + 2;
    let t = s + k + guard_bits(s) + 2;
    let b = Bounds {
        lo: exp_point(&r.lo, s, t, k, false),
        hi: exp_point(&r.hi, s, t, k, true),
        s: t,
    };

    (b.rescale(s), n.to_i128().unwrap_or_default())
}

const WORD_SCALE: usize = 64;
