//! BigFloat definition: representation, special values, range checking, and conversions.

use core::cmp::Ordering;

use num_bigint::{BigInt, BigUint, Sign as BigSign};
use num_traits::Zero;

use crate::common::buf::words_for_bits;
use crate::common::buf::WordBuf;
use crate::common::util::{
    biguint_to_aligned_words, is_power_of_two, low_mask, significant_bits, sub_1, add_1,
    words_to_biguint,
};
use crate::defs::{
    Error, Exponent, RoundingMode, Sign, Word, EXPONENT_MAX, EXPONENT_MIN, PREC_MAX, PREC_MIN,
    WORD_BIT_SIZE, WORD_MAX, WORD_SIGNIFICANT_BIT,
};
use crate::flags::{emax, emin, raise, ExceptionFlags, ExpoGuard};
use crate::ops::round::round_raw;

/// Kind of a floating point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Not a number.
    Nan,

    /// Infinity.
    Inf,

    /// Zero.
    Zero,

    /// Finite nonzero number.
    Regular,
}

/// A binary floating point number with a significand of an arbitrary precision.
///
/// A regular value equals `s × 0.m × 2^e`, where the significand `m` has `p` bits and its most
/// significant bit is set. Zero and infinity carry a sign.
///
/// Operations write their result into the receiver and round it to the receiver's precision.
/// They return a ternary value: negative if the result is less than the exact value, positive if
/// it is greater, and zero if the result is exact.
#[derive(Debug, Clone)]
pub struct BigFloat {
    pub(crate) p: usize,
    pub(crate) s: Sign,
    pub(crate) e: Exponent,
    pub(crate) kind: Kind,
    pub(crate) m: WordBuf,
}

/// Clamps an exponent computed with a wider type to the values which `check_range` handles correctly.
#[inline]
pub(crate) fn clamp_exponent(e: i128) -> Exponent {
    if e > EXPONENT_MAX as i128 + 1 {
        EXPONENT_MAX + 1
    } else if e < EXPONENT_MIN as i128 - 2 {
        EXPONENT_MIN - 2
    } else {
        e as Exponent
    }
}

impl BigFloat {
    fn check_precision(p: usize) -> Result<(), Error> {
        if (PREC_MIN..=PREC_MAX).contains(&p) {
            Ok(())
        } else {
            Err(Error::InvalidArgument)
        }
    }

    /// Returns a new NaN with precision of `p` bits.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the precision is incorrect.
    ///  - MemoryAllocation: failed to allocate memory for the significand.
    pub fn new(p: usize) -> Result<Self, Error> {
        Self::check_precision(p)?;
        Ok(BigFloat {
            p,
            s: Sign::Pos,
            e: 0,
            kind: Kind::Nan,
            m: WordBuf::with_bits(p)?,
        })
    }

    /// Returns the value `v` rounded to `p` bits to nearest.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the precision is incorrect.
    ///  - MemoryAllocation: failed to allocate memory for the significand.
    pub fn from_u64(v: u64, p: usize) -> Result<Self, Error> {
        let mut ret = Self::new(p)?;
        ret.set_ui(v, RoundingMode::ToEven);
        Ok(ret)
    }

    /// Returns the value `v` rounded to `p` bits to nearest.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the precision is incorrect.
    ///  - MemoryAllocation: failed to allocate memory for the significand.
    pub fn from_i64(v: i64, p: usize) -> Result<Self, Error> {
        let mut ret = Self::new(p)?;
        ret.set_si(v, RoundingMode::ToEven);
        Ok(ret)
    }

    /// Returns the value `f` rounded to `p` bits to nearest.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the precision is incorrect.
    ///  - MemoryAllocation: failed to allocate memory for the significand.
    pub fn from_f64(f: f64, p: usize) -> Result<Self, Error> {
        let mut ret = Self::new(p)?;
        ret.set_d(f, RoundingMode::ToEven);
        Ok(ret)
    }

    /// Returns a copy of `x` rounded to `p` bits using the rounding mode `rm`, and the ternary value.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the precision is incorrect.
    ///  - MemoryAllocation: failed to allocate memory for the significand.
    pub fn with_val(x: &Self, p: usize, rm: RoundingMode) -> Result<(Self, i32), Error> {
        let mut ret = Self::new(p)?;
        let t = ret.set(x, rm);
        Ok((ret, t))
    }

    /// Returns `u` as a number of one word precision. No range check is done.
    pub(crate) fn exact_ui(u: u64) -> Self {
        Self::exact_word(u, Sign::Pos, WORD_BIT_SIZE)
    }

    /// Returns `i` as a number of one word precision. No range check is done.
    pub(crate) fn exact_si(i: i64) -> Self {
        let s = if i < 0 { Sign::Neg } else { Sign::Pos };
        Self::exact_word(i.unsigned_abs(), s, WORD_BIT_SIZE)
    }

    /// Returns `f` with precision of 53 bits. No range check is done.
    pub(crate) fn exact_d(f: f64) -> Self {
        let s = if f.is_sign_negative() { Sign::Neg } else { Sign::Pos };
        let mut ret = Self::exact_word(0, s, 53);
        if f.is_nan() {
            ret.kind = Kind::Nan;
        } else if f.is_infinite() {
            ret.kind = Kind::Inf;
        } else if f != 0.0 {
            let bits = f.to_bits();
            let be = ((bits >> 52) & 0x7ff) as i64;
            let frac = bits & ((1u64 << 52) - 1);
            let (mant, e) = if be == 0 { (frac, -1074) } else { (frac | (1u64 << 52), be - 1075) };
            let lz = mant.leading_zeros();
            ret.m[0] = mant << lz;
            ret.e = e + (WORD_BIT_SIZE as u32 - lz) as i64;
            ret.kind = Kind::Regular;
        }
        ret
    }

    fn exact_word(u: u64, s: Sign, p: usize) -> Self {
        let (kind, e, w) = if u == 0 {
            (Kind::Zero, 0, 0)
        } else {
            let lz = u.leading_zeros();
            (Kind::Regular, (WORD_BIT_SIZE as u32 - lz) as Exponent, u << lz)
        };
        BigFloat {
            p,
            s,
            e,
            kind,
            m: WordBuf::from_word(w),
        }
    }

    /// Returns the precision in bits.
    #[inline]
    pub fn precision(&self) -> usize {
        self.p
    }

    /// Returns the sign. NaN carries a sign too, but it has no meaning.
    #[inline]
    pub fn sign(&self) -> Sign {
        self.s
    }

    /// Returns the exponent `e` of a regular value `0.m × 2^e`, and None otherwise.
    #[inline]
    pub fn exponent(&self) -> Option<Exponent> {
        if self.kind == Kind::Regular {
            Some(self.e)
        } else {
            None
        }
    }

    /// Returns the kind of the value.
    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the words of the significand, least significant first.
    #[inline]
    pub fn significand(&self) -> &[Word] {
        &self.m
    }

    /// Returns true if the value is NaN.
    #[inline]
    pub fn is_nan(&self) -> bool {
        self.kind == Kind::Nan
    }

    /// Returns true if the value is an infinity of either sign.
    #[inline]
    pub fn is_inf(&self) -> bool {
        self.kind == Kind::Inf
    }

    /// Returns true if the value is zero of either sign.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.kind == Kind::Zero
    }

    /// Returns true if the value is finite and nonzero.
    #[inline]
    pub fn is_regular(&self) -> bool {
        self.kind == Kind::Regular
    }

    /// Returns true if the value is NaN, infinity, or zero.
    #[inline]
    pub fn is_singular(&self) -> bool {
        self.kind != Kind::Regular
    }

    /// Returns true if the value is finite.
    #[inline]
    pub fn is_number(&self) -> bool {
        self.kind == Kind::Regular || self.kind == Kind::Zero
    }

    /// Returns true if the sign is negative, including negative zero and infinity.
    #[inline]
    pub fn is_sign_negative(&self) -> bool {
        self.s.is_negative()
    }

    /// Returns true if the sign is positive, including positive zero and infinity.
    #[inline]
    pub fn is_sign_positive(&self) -> bool {
        self.s.is_positive()
    }

    /// Returns true if the value is an integer.
    pub fn is_integer(&self) -> bool {
        match self.kind {
            Kind::Zero => true,
            Kind::Regular => self.e > 0 && self.e as u64 >= significant_bits(&self.m) as u64,
            _ => false,
        }
    }

    /// Returns the minimal number of bits needed to represent the significand exactly.
    /// Zero for singular values.
    pub fn min_prec(&self) -> usize {
        if self.is_regular() {
            significant_bits(&self.m)
        } else {
            0
        }
    }

    /// Returns true if a regular value is a power of two.
    #[inline]
    pub(crate) fn is_power_of_two_raw(&self) -> bool {
        is_power_of_two(&self.m)
    }

    /// Number of unused bits in the least significant word of the significand.
    #[inline]
    pub(crate) fn unused_bits(&self) -> usize {
        self.m.len() * WORD_BIT_SIZE - self.p
    }

    /// Sets NaN. Raises the invalid operation flag.
    pub fn set_nan(&mut self) {
        self.kind = Kind::Nan;
        raise(ExceptionFlags::INVALID);
    }

    /// Sets infinity with the sign `s`.
    pub fn set_inf(&mut self, s: Sign) {
        self.kind = Kind::Inf;
        self.s = s;
    }

    /// Sets zero with the sign `s`.
    pub fn set_zero(&mut self, s: Sign) {
        self.kind = Kind::Zero;
        self.s = s;
    }

    /// Sets a singular value of the kind `kind` and the sign `s`.
    /// Setting NaN raises the invalid operation flag.
    pub fn set_singular(&mut self, kind: Kind, s: Sign) {
        match kind {
            Kind::Nan => self.set_nan(),
            Kind::Inf => self.set_inf(s),
            Kind::Zero => self.set_zero(s),
            Kind::Regular => debug_assert!(false, "not a singular kind"),
        }
        self.s = s;
    }

    /// Changes the sign.
    pub fn neg(&mut self) {
        self.s = self.s.invert();
    }

    /// Makes the value positive.
    pub fn abs(&mut self) {
        self.s = Sign::Pos;
    }

    /// Sets the sign.
    #[inline]
    pub fn set_sign(&mut self, s: Sign) {
        self.s = s;
    }

    /// Reallocates the significand for the precision `p`. The value becomes NaN.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the precision is incorrect.
    ///  - MemoryAllocation: failed to allocate memory for the significand.
    pub fn set_prec(&mut self, p: usize) -> Result<(), Error> {
        Self::check_precision(p)?;
        self.m = WordBuf::with_bits(p)?;
        self.p = p;
        self.kind = Kind::Nan;
        Ok(())
    }

    /// Changes the precision to `p` bits keeping the value rounded using the rounding mode `rm`.
    /// Returns the ternary value.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the precision is incorrect.
    ///  - MemoryAllocation: failed to allocate memory for the significand.
    pub fn prec_round(&mut self, p: usize, rm: RoundingMode) -> Result<i32, Error> {
        Self::check_precision(p)?;
        let mut m = WordBuf::with_bits(p)?;
        if self.kind != Kind::Regular {
            self.m = m;
            self.p = p;
            return Ok(0);
        }
        let (inex, carry) = round_raw(&mut m, p, &self.m, false, self.s, rm);
        self.m = m;
        self.p = p;
        if carry {
            self.e += 1;
        }
        Ok(self.check_range(inex.signum() * self.s.to_int(), rm))
    }

    /// Sets `self` to `x` rounded using the rounding mode `rm`. Returns the ternary value.
    pub fn set(&mut self, x: &Self, rm: RoundingMode) -> i32 {
        self.set4(x, rm, x.s)
    }

    /// Sets `self` to `-x` rounded using the rounding mode `rm`. Returns the ternary value.
    pub fn set_neg(&mut self, x: &Self, rm: RoundingMode) -> i32 {
        self.set4(x, rm, x.s.invert())
    }

    /// Sets `self` to `|x|` rounded using the rounding mode `rm`. Returns the ternary value.
    pub fn set_abs(&mut self, x: &Self, rm: RoundingMode) -> i32 {
        self.set4(x, rm, Sign::Pos)
    }

    /// Sets `self` to `x` with the sign `s`.
    pub(crate) fn set4(&mut self, x: &Self, rm: RoundingMode, s: Sign) -> i32 {
        match x.kind {
            Kind::Nan => {
                self.set_nan();
                0
            }
            Kind::Inf => {
                self.set_inf(s);
                0
            }
            Kind::Zero => {
                self.set_zero(s);
                0
            }
            Kind::Regular => {
                self.kind = Kind::Regular;
                self.s = s;
                let (inex, carry) = round_raw(&mut self.m, self.p, &x.m, false, s, rm);
                self.e = clamp_exponent(x.e as i128 + carry as i128);
                self.check_range(inex.signum() * s.to_int(), rm)
            }
        }
    }

    /// Sets a regular value from the magnitude `n × 2^lsb`, where `n` is an integer, rounded using
    /// the rounding mode `rm`. If `sticky` is true, the exact magnitude is slightly greater than
    /// `n × 2^lsb`, but less than `(n + 1/2) × 2^lsb`. The result is range checked.
    pub(crate) fn set_natural(
        &mut self,
        n: &BigUint,
        lsb: i128,
        sticky: bool,
        s: Sign,
        rm: RoundingMode,
    ) -> i32 {
        if n.is_zero() {
            debug_assert!(!sticky);
            self.set_zero(s);
            return 0;
        }
        let bits = n.bits();
        let (w, _, _) = biguint_to_aligned_words(n, words_for_bits(bits as usize));
        self.kind = Kind::Regular;
        self.s = s;
        let (inex, carry) = round_raw(&mut self.m, self.p, &w, sticky, s, rm);
        self.e = clamp_exponent(lsb + bits as i128 + carry as i128);
        self.check_range(inex.signum() * s.to_int(), rm)
    }

    /// Sets the largest finite magnitude of the exponent range.
    pub(crate) fn set_max(&mut self, s: Sign) {
        self.kind = Kind::Regular;
        self.s = s;
        self.e = emax();
        self.m.fill(WORD_MAX);
        let sh = self.unused_bits();
        self.m[0] &= !low_mask(sh);
    }

    /// Sets the smallest positive magnitude of the exponent range.
    pub(crate) fn set_min(&mut self, s: Sign) {
        self.kind = Kind::Regular;
        self.s = s;
        self.e = emin();
        self.m.fill(0);
        let l = self.m.len();
        self.m[l - 1] = WORD_SIGNIFICANT_BIT;
    }

    /// Sets overflow result: infinity or the largest finite number depending on the rounding mode.
    /// Raises overflow and inexact flags, and returns the ternary value.
    pub fn overflow(&mut self, rm: RoundingMode, s: Sign) -> i32 {
        let inex = if rm.is_like_to_zero(s) {
            self.set_max(s);
            -1
        } else {
            self.set_inf(s);
            1
        };
        raise(ExceptionFlags::INEXACT | ExceptionFlags::OVERFLOW);
        inex * s.to_int()
    }

    /// Sets underflow result: zero or the smallest positive number depending on the rounding mode.
    /// Raises underflow and inexact flags, and returns the ternary value.
    pub fn underflow(&mut self, rm: RoundingMode, s: Sign) -> i32 {
        let inex = if rm.is_like_to_zero(s) {
            self.set_zero(s);
            -1
        } else {
            self.set_min(s);
            1
        };
        raise(ExceptionFlags::INEXACT | ExceptionFlags::UNDERFLOW);
        inex * s.to_int()
    }

    /// Brings a value, whose exponent can be outside of the current exponent range, into the range.
    /// `t` is the ternary value of the rounding which produced the value.
    /// Raises the inexact flag if the result is inexact, and returns the final ternary value.
    pub fn check_range(&mut self, t: i32, rm: RoundingMode) -> i32 {
        if self.kind == Kind::Regular {
            let e = self.e;
            if e < emin() {
                let mut rm = rm;
                // below the half of the smallest number, or exactly the half of it with the
                // exact value not greater in magnitude
                if rm == RoundingMode::ToEven
                    && (e + 1 < emin()
                        || (self.is_power_of_two_raw()
                            && if self.s.is_negative() { t <= 0 } else { t >= 0 }))
                {
                    rm = RoundingMode::ToZero;
                }
                return self.underflow(rm, self.s);
            }
            if e > emax() {
                return self.overflow(rm, self.s);
            }
        }
        if t != 0 {
            raise(ExceptionFlags::INEXACT);
        }
        t
    }

    /// Emulates gradual underflow of IEEE 754 formats: if the exponent of a regular value is
    /// less than `emin + p - 1`, the value is rounded to `e - emin + 1` bits.
    /// `t` is the ternary value of the operation which produced the value; it resolves
    /// the double rounding cases.
    pub fn subnormalize(&mut self, t: i32, rm: RoundingMode) -> i32 {
        if self.kind != Kind::Regular {
            return t;
        }
        let lim = emin() as i128 + self.p as i128 - 1;
        if self.e as i128 >= lim {
            return t;
        }

        let q = (self.e - emin() + 1) as usize;
        debug_assert!(q >= 1 && q < self.p);

        let mut m = self.m.clone();
        let (mut inex, carry) = round_raw(&mut m, q, &self.m, false, self.s, rm);
        let mut carry = carry;

        // a tie: the exact value lies on the side given by t
        if inex.abs() == 2 && t != 0 {
            let exact_below = t * self.s.to_int() > 0;
            if exact_below && inex > 0 {
                // rounded up at the tie, exact is below: truncate instead
                let (_, c) = round_raw(&mut m, q, &self.m, false, self.s, RoundingMode::ToZero);
                carry = c;
                inex = -1;
            } else if !exact_below && inex < 0 {
                let (_, c) = round_raw(&mut m, q, &self.m, false, self.s, RoundingMode::FromZero);
                carry = c;
                inex = 1;
            }
        } else if inex == 0 {
            return t;
        }

        // the significand of q bits is stored with the precision p
        self.m = m;
        if carry {
            self.e += 1;
        }
        self.check_range(inex.signum() * self.s.to_int(), rm)
    }

    /// Sets the value of `u` rounded using the rounding mode `rm`.
    pub fn set_ui(&mut self, u: u64, rm: RoundingMode) -> i32 {
        self.set_natural(&BigUint::from(u), 0, false, Sign::Pos, rm)
    }

    /// Sets the value of `i` rounded using the rounding mode `rm`.
    pub fn set_si(&mut self, i: i64, rm: RoundingMode) -> i32 {
        let s = if i < 0 { Sign::Neg } else { Sign::Pos };
        self.set_natural(&BigUint::from(i.unsigned_abs()), 0, false, s, rm)
    }

    /// Sets the value of `u × 2^e` rounded using the rounding mode `rm`.
    pub fn set_ui_2exp(&mut self, u: u64, e: Exponent, rm: RoundingMode) -> i32 {
        self.set_natural(&BigUint::from(u), e as i128, false, Sign::Pos, rm)
    }

    /// Sets the value of `i × 2^e` rounded using the rounding mode `rm`.
    pub fn set_si_2exp(&mut self, i: i64, e: Exponent, rm: RoundingMode) -> i32 {
        let s = if i < 0 { Sign::Neg } else { Sign::Pos };
        self.set_natural(&BigUint::from(i.unsigned_abs()), e as i128, false, s, rm)
    }

    /// Sets the value of `z × 2^e` rounded using the rounding mode `rm`.
    pub fn set_z_2exp(&mut self, z: &BigInt, e: Exponent, rm: RoundingMode) -> i32 {
        let s = if z.sign() == BigSign::Minus { Sign::Neg } else { Sign::Pos };
        self.set_natural(z.magnitude(), e as i128, false, s, rm)
    }

    /// Sets the value of `z` rounded using the rounding mode `rm`.
    pub fn set_z(&mut self, z: &BigInt, rm: RoundingMode) -> i32 {
        self.set_z_2exp(z, 0, rm)
    }

    /// Returns `(z, e)` such that the value equals `z × 2^e` exactly.
    /// For singular values, or if `e` does not fit the exponent type, returns `(0, 0)`
    /// and raises the range error flag.
    pub fn get_z_2exp(&self) -> (BigInt, Exponent) {
        if self.kind != Kind::Regular {
            raise(ExceptionFlags::ERANGE);
            return (BigInt::zero(), 0);
        }
        let e = self.e as i128 - self.p as i128;
        if e < Exponent::MIN as i128 {
            raise(ExceptionFlags::ERANGE);
            return (BigInt::zero(), 0);
        }
        let n = words_to_biguint(&self.m) >> self.unused_bits();
        let s = if self.s.is_negative() { BigSign::Minus } else { BigSign::Plus };
        (BigInt::from_biguint(s, n), e as Exponent)
    }

    /// Sets the value of `f` rounded using the rounding mode `rm`.
    pub fn set_d(&mut self, f: f64, rm: RoundingMode) -> i32 {
        let s = if f.is_sign_negative() { Sign::Neg } else { Sign::Pos };
        if f.is_nan() {
            self.set_nan();
            return 0;
        }
        if f.is_infinite() {
            self.set_inf(s);
            return 0;
        }
        if f == 0.0 {
            self.set_zero(s);
            return 0;
        }
        let bits = f.to_bits();
        let be = ((bits >> 52) & 0x7ff) as i64;
        let frac = bits & ((1u64 << 52) - 1);
        let (mant, e) = if be == 0 { (frac, -1074) } else { (frac | (1u64 << 52), be - 1075) };
        self.set_natural(&BigUint::from(mant), e as i128, false, s, rm)
    }

    /// Converts the value to f64 rounding it using the rounding mode `rm`.
    /// Values beyond the f64 range are converted to infinity or the largest finite f64
    /// depending on the rounding mode, and tiny values to zero or the smallest subnormal f64.
    pub fn get_d(&self, rm: RoundingMode) -> f64 {
        match self.kind {
            Kind::Nan => f64::NAN,
            Kind::Inf => {
                if self.s.is_negative() {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            }
            Kind::Zero => {
                if self.s.is_negative() {
                    -0.0
                } else {
                    0.0
                }
            }
            Kind::Regular => self.get_d_regular(rm),
        }
    }

    fn get_d_regular(&self, rm: RoundingMode) -> f64 {
        let sgn = if self.s.is_negative() { -1.0 } else { 1.0 };
        let max = sgn * f64::MAX;
        let inf = sgn * f64::INFINITY;
        let tiny = sgn * f64::from_bits(1);

        if self.e > 1024 {
            return if rm.is_like_to_zero(self.s) { max } else { inf };
        }

        // lsb position of the result
        let lsb = (self.e - 53).max(-1074);
        let q = self.e - lsb;
        if q <= 0 {
            let to_min = if rm.is_like_from_zero(self.s) {
                true
            } else if rm == RoundingMode::ToEven {
                // the half of the smallest subnormal is a tie rounded to zero
                q == 0 && !self.is_power_of_two_raw()
            } else {
                false
            };
            return if to_min { tiny } else { sgn * 0.0 };
        }

        let mut t = match BigFloat::new(q as usize) {
            Ok(t) => t,
            Err(_) => return f64::NAN,
        };
        let (_, carry) = round_raw(&mut t.m, q as usize, &self.m, false, self.s, rm);
        let e = self.e + carry as i64;
        if e > 1024 {
            return if rm.is_like_to_zero(self.s) { max } else { inf };
        }
        let mant = t.m[t.m.len() - 1] >> (WORD_BIT_SIZE - q as usize);
        // the value is mant × 2^(e - q), exactly representable
        let mut v = mant as f64;
        let mut k = e - q;
        while k > 1000 {
            v *= pow2_f64(1000);
            k -= 1000;
        }
        while k < -1000 {
            v *= pow2_f64(-1000);
            k += 1000;
        }
        sgn * v * pow2_f64(k)
    }

    /// Sets `self` to the next representable value toward positive infinity.
    pub fn nextabove(&mut self) {
        if self.is_nan() {
            raise(ExceptionFlags::INVALID);
            return;
        }
        if self.s.is_negative() {
            self.next_toward_zero();
        } else {
            self.next_toward_inf();
        }
    }

    /// Sets `self` to the next representable value toward negative infinity.
    pub fn nextbelow(&mut self) {
        if self.is_nan() {
            raise(ExceptionFlags::INVALID);
            return;
        }
        if self.s.is_negative() {
            self.next_toward_inf();
        } else {
            self.next_toward_zero();
        }
    }

    /// Sets `self` to the next representable value toward `y`.
    pub fn nexttoward(&mut self, y: &Self) {
        if self.is_nan() || y.is_nan() {
            self.set_nan();
            return;
        }
        match self.cmp(y) {
            Some(Ordering::Less) => self.nextabove(),
            Some(Ordering::Greater) => self.nextbelow(),
            _ => {}
        }
    }

    fn next_toward_zero(&mut self) {
        match self.kind {
            Kind::Inf => self.set_max(self.s),
            Kind::Zero => {
                self.s = self.s.invert();
                self.set_min(self.s);
            }
            Kind::Regular => {
                let sh = self.unused_bits();
                sub_1(&mut self.m, 1 << sh);
                let l = self.m.len();
                if self.m[l - 1] & WORD_SIGNIFICANT_BIT == 0 {
                    // the value was a power of two
                    if self.e == emin() {
                        self.set_zero(self.s);
                    } else {
                        self.e -= 1;
                        self.m.fill(WORD_MAX);
                        self.m[0] &= !low_mask(sh);
                    }
                }
            }
            Kind::Nan => {}
        }
    }

    fn next_toward_inf(&mut self) {
        match self.kind {
            Kind::Zero => self.set_min(self.s),
            Kind::Regular => {
                let sh = self.unused_bits();
                if add_1(&mut self.m, 1 << sh) != 0 {
                    if self.e == emax() {
                        self.set_inf(self.s);
                    } else {
                        self.e += 1;
                        let l = self.m.len();
                        self.m[l - 1] = WORD_SIGNIFICANT_BIT;
                    }
                }
            }
            _ => {}
        }
    }

    /// Sets `self` to `x × 2^n` rounded using the rounding mode `rm`.
    pub fn mul_2si(&mut self, x: &Self, n: i64, rm: RoundingMode) -> i32 {
        let g = ExpoGuard::new();
        let t = self.set(x, rm);
        if self.is_regular() {
            self.e = clamp_exponent(self.e as i128 + n as i128);
        }
        g.finish(self, t, rm)
    }

    /// Sets `self` to `x × 2^n` rounded using the rounding mode `rm`.
    pub fn mul_2ui(&mut self, x: &Self, n: u64, rm: RoundingMode) -> i32 {
        let n = n.min(i64::MAX as u64) as i64;
        self.mul_2si(x, n, rm)
    }

    /// Sets `self` to `x / 2^n` rounded using the rounding mode `rm`.
    pub fn div_2si(&mut self, x: &Self, n: i64, rm: RoundingMode) -> i32 {
        let n = if n == i64::MIN { i64::MAX } else { -n };
        self.mul_2si(x, n, rm)
    }

    /// Sets `self` to `x / 2^n` rounded using the rounding mode `rm`.
    pub fn div_2ui(&mut self, x: &Self, n: u64, rm: RoundingMode) -> i32 {
        let n = n.min(i64::MAX as u64) as i64;
        self.mul_2si(x, -n, rm)
    }

    /// Returns a random normalized number with precision `p`, an exponent in the range from `exp_from`
    /// to `exp_to` inclusive, and a random sign.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the precision is incorrect, or `exp_from` is greater than `exp_to`.
    ///  - MemoryAllocation: failed to allocate memory for the significand.
    #[cfg(feature = "random")]
    pub fn random_normal(p: usize, exp_from: Exponent, exp_to: Exponent) -> Result<Self, Error> {
        if exp_from > exp_to {
            return Err(Error::InvalidArgument);
        }
        let mut ret = Self::new(p)?;
        for w in ret.m.iter_mut() {
            *w = rand::random::<Word>();
        }
        let l = ret.m.len();
        ret.m[l - 1] |= WORD_SIGNIFICANT_BIT;
        let sh = ret.unused_bits();
        ret.m[0] &= !low_mask(sh);
        let range = (exp_to as i128 - exp_from as i128 + 1) as u128;
        ret.e = (exp_from as i128 + (rand::random::<u128>() % range) as i128) as Exponent;
        ret.s = if rand::random::<bool>() { Sign::Neg } else { Sign::Pos };
        ret.kind = Kind::Regular;
        Ok(ret)
    }

    /// Returns a uniformly distributed random number in the range [0, 1) with precision `p`.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the precision is incorrect.
    ///  - MemoryAllocation: failed to allocate memory for the significand.
    #[cfg(feature = "random")]
    pub fn random_bits(p: usize) -> Result<Self, Error> {
        let mut ret = Self::new(p)?;
        let mut w = WordBuf::with_bits(p)?;
        for v in w.iter_mut() {
            *v = rand::random::<Word>();
        }
        let sh = w.len() * WORD_BIT_SIZE - p;
        let n = words_to_biguint(&w) >> sh;
        let g = ExpoGuard::new();
        let t = ret.set_natural(&n, -(p as i128), false, Sign::Pos, RoundingMode::ToZero);
        g.finish(&mut ret, t, RoundingMode::ToZero);
        Ok(ret)
    }
}

/// Exact 2^k for -1022 <= k <= 1023.
fn pow2_f64(k: i64) -> f64 {
    debug_assert!((-1022..=1023).contains(&k));
    f64::from_bits(((k + 1023) as u64) << 52)
}

impl Default for BigFloat {
    /// NaN with the default precision.
    fn default() -> Self {
        BigFloat {
            p: crate::defs::DEFAULT_P,
            s: Sign::Pos,
            e: 0,
            kind: Kind::Nan,
            m: WordBuf::from_word(0),
        }
    }
}
