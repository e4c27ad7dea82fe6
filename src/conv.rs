//! Conversion between binary numbers and digits in other bases.

use core::cmp::Ordering;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::common::util::log2_floor;
use crate::defs::{Error, Exponent, RoundingMode, Sign, WORD_BIT_SIZE};
use crate::flags::{emax, emin, raise, ExceptionFlags, ExpoGuard};
use crate::num::BigFloat;
use crate::ops::pow::underflow_rm;
use crate::ops::series::Bounds;
use crate::ops::ziv::{working_prec, ziv, Attempt};

/// Checks the base and returns its absolute value.
pub(crate) fn check_base(base: i32) -> Result<u32, Error> {
    match base {
        2..=62 => Ok(base as u32),
        -36..=-2 => Ok(base.unsigned_abs()),
        _ => Err(Error::InvalidArgument),
    }
}

// b^k, or an error if k is out of the reach of memory
fn base_pow(b: u32, k: u128) -> Result<BigUint, Error> {
    if b == 1 {
        return Ok(BigUint::one());
    }
    let k = u32::try_from(k).map_err(|_| Error::MemoryAllocation)?;
    Ok(BigUint::from(b).pow(k))
}

// The number of digits which allows to read back a number of precision `p`.
fn roundtrip_digits(p: usize, b: u32) -> usize {
    if b.is_power_of_two() {
        let k = b.trailing_zeros() as usize;
        1 + (p - 1 + k - 1) / k
    } else {
        1 + (p as f64 * core::f64::consts::LN_2 / (b as f64).ln()).ceil() as usize
    }
}

// The quotient a/d rounded with `rm` for a positive value, and true if the rounding was inexact.
fn div_round(a: &BigUint, d: &BigUint, rm: RoundingMode) -> (BigUint, bool) {
    let (q, r) = a.div_rem(d);
    if r.is_zero() {
        return (q, false);
    }
    let up = match rm {
        RoundingMode::ToEven => match (&r << 1usize).cmp(d) {
            Ordering::Greater => true,
            Ordering::Equal => q.is_odd(),
            Ordering::Less => false,
        },
        RoundingMode::FromZero => true,
        _ => false,
    };
    if up {
        (q + 1u32, true)
    } else {
        (q, true)
    }
}

// n × 2^g rounded to an integer with `rm`.
fn round_scaled(n: &BigUint, g: i128, rm: RoundingMode) -> BigUint {
    if g >= 0 {
        n << g as usize
    } else {
        div_round(n, &(BigUint::one() << (-g) as usize), rm).0
    }
}

/// Splits the base into `2^j × c` with an odd `c`.
#[inline]
fn split_base(b: u32) -> (i128, u32) {
    let j = b.trailing_zeros();
    (j as i128, b >> j)
}

/// Encloses `c^k`: `lo × 2^s <= c^k <= hi × 2^s`, where `hi` has at most `w` bits.
/// The relative width of the enclosure is less than `2^(bits(k) + 2 - w)`.
fn pow_bounds(c: u32, k: u128, w: usize) -> (BigUint, BigUint, i128) {
    let mut lo = BigUint::one();
    let mut hi = BigUint::one();
    let mut s: i128 = 0;
    for i in (0..128 - k.leading_zeros()).rev() {
        lo = &lo * &lo;
        hi = &hi * &hi;
        s *= 2;
        if (k >> i) & 1 == 1 {
            lo *= c;
            hi *= c;
        }
        let bits = hi.bits() as usize;
        if bits > w {
            let sh = bits - w;
            lo >>= sh;
            hi = (hi + ((BigUint::one() << sh) - 1u32)) >> sh;
            s += sh as i128;
        }
    }
    (lo, hi, s)
}

/// Encloses `v = n × c^k × 2^sh`: `lo × 2^g <= v <= hi × 2^g`, where the bounds have at least
/// about `w` bits. `None` if the precision is too small to bound the divisor away from zero.
fn scaled_bounds(n: &BigUint, c: u32, k: i128, sh: i128, w: usize) -> Option<(BigUint, BigUint, i128)> {
    let (plo, phi, ps) = pow_bounds(c, k.unsigned_abs(), w);
    if k >= 0 {
        return Some((n * plo, n * phi, ps + sh));
    }
    if plo.is_zero() {
        return None;
    }
    let t = (w as i128 + phi.bits() as i128 - n.bits() as i128).max(0) as usize;
    let num = n << t;
    let lo = &num / &phi;
    let (q, r) = num.div_rem(&plo);
    let hi = if r.is_zero() { q } else { q + 1u32 };
    Some((lo, hi, sh - ps - t as i128))
}

/// Whether `c^|k|` is small enough for exact arithmetic with values of `bits` bits.
/// Beyond that, `n × c^k × 2^sh` is never a dyadic number of `bits` bits, nor a midpoint of two.
#[inline]
fn exact_is_cheap(c: u32, k: i128, bits: usize) -> bool {
    c == 1 || k.unsigned_abs() as f64 * (c as f64).log2() <= (bits + EXACT_MARGIN) as f64
}

const EXACT_MARGIN: usize = 64;

// Result of one attempt to place `|x| × b^(m - e)` among the integers with `m` digits.
enum DigitStep {
    Done(BigUint, bool),
    // the digit exponent must change by the amount
    Move(i128),
    Retry,
}

// Change of the digit exponent for a value `v` out of [b^(m - 1), b^m) on the side given by `up`.
// `vb` is a lower bound of log2(v) if `up` is true, and an upper bound otherwise, so the move
// never jumps over the range.
fn digit_move(vb: f64, m: usize, log2b: f64, up: bool) -> DigitStep {
    let d = (vb / log2b).floor() as i128 - (m as i128 - 1);
    DigitStep::Move(if up { d.max(1) } else { d.min(-1) })
}

impl BigFloat {
    /// Converts the number to `n` digits in the base `|base|`, rounded using the rounding mode `rm`.
    /// `n = 0` selects the number of digits which is enough to read the number back without a loss.
    ///
    /// Returns the sign, the digit values, most significant first, and the exponent `e`, such that
    /// the number equals `±0.d₁d₂…dₙ × base^e`. Zero gives an empty list of digits.
    /// The inexact flag is raised if the digits do not represent the number exactly.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the number is NaN or infinite, or the base is not in 2..=62 or -36..=-2.
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn to_digits(&self, base: i32, n: usize, rm: RoundingMode) -> Result<(Sign, Vec<u8>, Exponent), Error> {
        let b = check_base(base)?;
        if self.is_nan() || self.is_inf() {
            return Err(Error::InvalidArgument);
        }
        if self.is_zero() {
            return Ok((self.s, Vec::new(), 0));
        }

        let m = if n == 0 { roundtrip_digits(self.p, b) } else { n };
        let rm = rm.to_magnitude(self.s);

        // |x| = a × 2^l
        let (a, l) = self.significand_and_lsb();
        let (j, c) = split_base(b);

        // b^(e - 1) <= |x| < b^e
        let log2b = (b as f64).log2();
        let mut e = ((self.e as f64 - 1.0) / log2b).floor() as i128 + 1;

        let lo_d = base_pow(b, m as u128 - 1)?;
        let hi_d = &lo_d * b;
        let digit_bits = (m as f64 * log2b).ceil() as usize;
        let mut extra = WORD_BIT_SIZE;

        let (d, inexact) = loop {
            // |x| × b^k = a × c^k × 2^sh
            let k = m as i128 - e;
            let sh = l + j * k;

            let step = if exact_is_cheap(c, k, self.p + digit_bits) {
                let mut num = a.clone();
                let mut den = BigUint::one();
                if k >= 0 {
                    num *= base_pow(c, k as u128)?;
                } else {
                    den = base_pow(c, (-k) as u128)?;
                }
                if sh >= 0 {
                    num <<= sh as usize;
                } else {
                    den <<= (-sh) as usize;
                }

                // 2^(nb - db - 1) < v < 2^(nb - db + 1)
                let t = &num / &den;
                let vb = num.bits() as f64 - den.bits() as f64;
                if t >= hi_d {
                    digit_move(vb - 1.0, m, log2b, true)
                } else if t < lo_d {
                    digit_move(vb + 1.0, m, log2b, false)
                } else {
                    let (d, inexact) = div_round(&num, &den, rm);
                    DigitStep::Done(d, inexact)
                }
            } else {
                let w = digit_bits + 128 - k.unsigned_abs().leading_zeros() as usize + extra;
                match scaled_bounds(&a, c, k, sh, w) {
                    Some((lo, hi, g)) => {
                        let fl = round_scaled(&lo, g, RoundingMode::ToZero);
                        let fh = round_scaled(&hi, g, RoundingMode::ToZero);
                        if fh < lo_d {
                            digit_move(hi.bits() as f64 + g as f64, m, log2b, false)
                        } else if fl >= hi_d {
                            digit_move(lo.bits() as f64 - 1.0 + g as f64, m, log2b, true)
                        } else if fl < lo_d || fh >= hi_d {
                            DigitStep::Retry
                        } else {
                            let d = round_scaled(&lo, g, rm);
                            if d == round_scaled(&hi, g, rm) {
                                DigitStep::Done(d, true)
                            } else {
                                DigitStep::Retry
                            }
                        }
                    }
                    None => DigitStep::Retry,
                }
            };

            match step {
                DigitStep::Done(d, inexact) => break (d, inexact),
                DigitStep::Move(k) => e += k,
                DigitStep::Retry => {
                    log::trace!("to_digits: {} extra bits are not enough", extra);
                    extra += extra;
                }
            }
        };

        let d = if d == hi_d {
            e += 1;
            lo_d
        } else {
            d
        };

        if inexact {
            raise(ExceptionFlags::INEXACT);
        }

        let mut digits = d.to_radix_be(b);
        digits.resize(m, 0);
        Ok((self.s, digits, e as Exponent))
    }

    /// Sets `self` to `±0.d₁d₂…dₙ × base^e` rounded using the rounding mode `rm`, where `digits`
    /// are digit values, most significant first. Returns the ternary value.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the base is not in 2..=62 or -36..=-2, or a digit is not less than the base.
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn from_digits(
        &mut self,
        s: Sign,
        digits: &[u8],
        base: i32,
        e: Exponent,
        rm: RoundingMode,
    ) -> Result<i32, Error> {
        let b = check_base(base)?;
        if digits.iter().any(|&d| d as u32 >= b) {
            return Err(Error::InvalidArgument);
        }

        let lead = digits.iter().take_while(|&&d| d == 0).count();
        let digits = &digits[lead..];
        if digits.is_empty() {
            self.set_zero(s);
            return Ok(0);
        }
        let e = e as i128 - lead as i128;

        // b^(e - 1) <= |x| < b^e, and 2^lb <= b
        let lb = log2_floor(b as u64) as i128;
        if (e - 1) * lb >= emax() as i128 {
            return Ok(self.overflow(rm, s));
        }
        if e <= 0 && e * lb < emin() as i128 - 1 {
            return Ok(self.underflow(underflow_rm(rm), s));
        }

        // |x| = d × c^k × 2^(j × k)
        let d = BigUint::from_radix_be(digits, b).ok_or(Error::InvalidArgument)?;
        let k = e - digits.len() as i128;
        let (j, c) = split_base(b);

        if exact_is_cheap(c, k, self.p + d.bits() as usize) {
            if k >= 0 {
                let v = d * base_pow(c, k as u128)?;
                return Ok(self.set_natural(&v, j * k, false, s, rm));
            }

            // enough quotient bits for the rounding bit, the rest goes into the sticky bit
            let den = base_pow(c, (-k) as u128)?;
            let sh = (self.p as i128 + 2 + den.bits() as i128 - d.bits() as i128).max(0);
            let (q, r) = (d << sh as usize).div_rem(&den);
            return Ok(self.set_natural(&q, j * k - sh, !r.is_zero(), s, rm));
        }

        // the value is neither representable nor a midpoint, so the refinement terminates
        let guard = ExpoGuard::new();
        let kbits = 128 - k.unsigned_abs().leading_zeros() as usize;
        let w0 = working_prec(self.p, kbits + 8);
        ziv(self, rm, guard, "from_digits", w0, |w| match scaled_bounds(&d, c, k, j * k, w) {
            Some((lo, hi, g)) => {
                let (lo, hi) = (BigInt::from(lo), BigInt::from(hi));
                let b = if s.is_negative() {
                    Bounds { lo: -hi, hi: -lo, s: 0 }
                } else {
                    Bounds { lo, hi, s: 0 }
                };
                Attempt::from_bounds(&b, g)
            }
            None => Ok(Attempt::Retry),
        })
    }
}
