//! Iterative refinement of approximations until they can be rounded correctly.

use num_traits::{Signed, Zero};

use crate::common::util::log2_ceil;
use crate::defs::{Error, Exponent, RoundingMode, Sign, PREC_MIN, WORD_BIT_SIZE};
use crate::flags::ExpoGuard;
use crate::num::{clamp_exponent, BigFloat};
use crate::ops::series::Bounds;

/// Outcome of one evaluation step at a working precision.
#[derive(Debug)]
pub(crate) enum Attempt {
    /// `t × 2^shift` approximates the exact value `v`: `|v × 2^-shift - t| < 2^(EXP(t) - err)`.
    Approx { t: BigFloat, err: Exponent, shift: i128 },

    /// The exact value is `t × 2^shift`.
    Exact { t: BigFloat, shift: i128 },

    /// The exact value is known to overflow with the given sign.
    Overflow(Sign),

    /// The exact value is known to underflow with the given sign.
    Underflow(Sign),

    /// Nothing can be concluded at this precision.
    Retry,
}

impl Attempt {
    /// Converts an enclosure of `v × 2^-shift` into an approximation.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for the approximation.
    pub fn from_bounds(b: &Bounds, shift: i128) -> Result<Self, Error> {
        if b.lo.is_zero() || b.hi.is_zero() || b.lo.is_negative() != b.hi.is_negative() {
            return Ok(Attempt::Retry);
        }

        let bits = b.lo.bits() as usize;
        let mut t = BigFloat::new(bits.max(PREC_MIN))?;
        let inex = t.set_z_2exp(&b.lo, -(b.s as Exponent), RoundingMode::ToZero);
        debug_assert_eq!(inex, 0);

        let w = b.width();
        if w.is_zero() {
            Ok(Attempt::Exact { t, shift })
        } else {
            let err = bits as Exponent - w.bits() as Exponent;
            Ok(Attempt::Approx { t, err, shift })
        }
    }
}

/// Initial working precision for the target precision `p`.
#[inline]
pub(crate) fn working_prec(p: usize, extra: usize) -> usize {
    p + log2_ceil(p as u64) as usize + extra
}

/// Runs `step` at increasing working precisions until its approximation can be rounded
/// to the precision of `y` with the rounding mode `rm`, and sets `y` to the rounded value.
///
/// `guard` is the extended exponent range scope of the caller. It is released before the
/// result is brought into the caller's range. `name` identifies the function in the log.
pub(crate) fn ziv<F>(
    y: &mut BigFloat,
    rm: RoundingMode,
    guard: ExpoGuard,
    name: &str,
    w0: usize,
    mut step: F,
) -> Result<i32, Error>
where
    F: FnMut(usize) -> Result<Attempt, Error>,
{
    let p = y.precision();
    let mut w = w0;
    let mut inc = WORD_BIT_SIZE;

    loop {
        match step(w)? {
            Attempt::Approx { t, err, shift } => {
                if t.ziv_can_round(err, p, rm) {
                    return Ok(finish(y, &t, shift, rm, guard));
                }
                log::trace!("{}: working precision {} is not enough, error exponent {}", name, w, err);
            }
            Attempt::Exact { t, shift } => return Ok(finish(y, &t, shift, rm, guard)),
            Attempt::Overflow(s) => {
                drop(guard);
                return Ok(y.overflow(rm, s));
            }
            Attempt::Underflow(s) => {
                drop(guard);
                let rm = if rm == RoundingMode::ToEven { RoundingMode::ToZero } else { rm };
                return Ok(y.underflow(rm, s));
            }
            Attempt::Retry => {
                log::trace!("{}: working precision {} is not enough", name, w);
            }
        }

        w += inc;
        inc = w / 2;
    }
}

fn finish(y: &mut BigFloat, t: &BigFloat, shift: i128, rm: RoundingMode, guard: ExpoGuard) -> i32 {
    let inex = y.set(t, rm);
    if y.is_regular() {
        y.e = clamp_exponent(y.e as i128 + shift);
    }
    guard.finish(y, inex, rm)
}

/// Sets `y` to the rounding of a value which differs from 1 by less than a quarter of the ulp
/// of 1 at the precision of `y`. The value is above 1 if `s` is positive, and below 1 otherwise.
/// The result is not range checked.
pub(crate) fn near_one(y: &mut BigFloat, s: Sign, rm: RoundingMode) -> i32 {
    y.set_ui(1, RoundingMode::ToEven);
    match rm.to_magnitude(Sign::Pos) {
        RoundingMode::ToZero if s.is_negative() => {
            y.nextbelow();
            -1
        }
        RoundingMode::FromZero if s.is_positive() => {
            y.nextabove();
            1
        }
        _ => -s.to_int(),
    }
}

/// Like `near_one`, for a value of the sign `s` whose magnitude is above 1 if `up` is true.
pub(crate) fn near_one_signed(y: &mut BigFloat, up: bool, s: Sign, rm: RoundingMode) -> i32 {
    let dir = if up { Sign::Pos } else { Sign::Neg };
    if s.is_negative() {
        let t = near_one(y, dir, rm.invert());
        y.neg();
        -t
    } else {
        near_one(y, dir, rm)
    }
}

/// Sets `y` to the rounding of a value which lies between `x` and `x ± 2^(EXP(x) - q - 2)`, where `q`
/// is the larger of the precisions of `x` and `y`, above `x` if `above` is true, and never equals `x`.
pub(crate) fn round_near_x(y: &mut BigFloat, x: &BigFloat, above: bool, rm: RoundingMode) -> i32 {
    debug_assert!(x.is_regular());
    let q = y.precision().max(x.precision()) as i128;
    let mut tiny = BigFloat::exact_ui(1);
    tiny.e = clamp_exponent(x.e as i128 - q - 2);
    if above {
        y.add(x, &tiny, rm)
    } else {
        y.sub(x, &tiny, rm)
    }
}
