//! BigFloat formatting and parsing.

use core::fmt::{Display, Formatter, Write};
use core::str::FromStr;

use crate::conv::check_base;
use crate::defs::{Error, Exponent, RoundingMode, DEFAULT_P, DEFAULT_RM};
use crate::flags::{flags, set_flags};
use crate::num::{BigFloat, Kind};
use crate::parser::parse;

const DIGITS_LOWER: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const DIGITS_UPPER: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS_62: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

fn digit_char(d: u8, base: i32) -> char {
    let d = d as usize;
    (match base {
        37..=62 => DIGITS_62[d],
        b if b < 0 => DIGITS_UPPER[d],
        _ => DIGITS_LOWER[d],
    }) as char
}

impl BigFloat {
    /// Formats the number with `n` significant digits in the base `|base|` using the rounding mode `rm`.
    /// `n = 0` selects the number of digits which is enough to read the number back without a loss.
    /// A negative base selects upper case letters.
    ///
    /// The result has the form `[-]d.ddd` followed by the exponent, which is preceded by `e` in
    /// bases up to 10, and by `@` in larger bases. For example, `1.25e+2` is `125` in base 10.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the base is not in 2..=62 or -36..=-2.
    ///  - MemoryAllocation: failed to allocate memory for the result.
    pub fn to_string_radix(&self, base: i32, n: usize, rm: RoundingMode) -> Result<String, Error> {
        let b = check_base(base)?;

        let mut mstr = String::new();
        if self.is_sign_negative() && !self.is_nan() {
            mstr.push('-');
        }

        match self.kind {
            Kind::Nan | Kind::Inf => {
                let name = if self.is_nan() { "NaN" } else { "Inf" };
                if b > 10 {
                    let _ = write!(mstr, "@{}@", name);
                } else {
                    mstr.push_str(name);
                }
                return Ok(mstr);
            }
            Kind::Zero => {
                mstr.push_str("0.0");
                return Ok(mstr);
            }
            Kind::Regular => {}
        }

        let (_, m, e) = self.to_digits(base, n, rm)?;
        mstr.try_reserve_exact(m.len() + 24)?;

        let mut iter = m.iter();
        if let Some(&d) = iter.next() {
            mstr.push(digit_char(d, base));
        }
        mstr.push('.');
        if m.len() == 1 {
            mstr.push('0');
        }
        iter.for_each(|&d| mstr.push(digit_char(d, base)));

        let sep = if b <= 10 { 'e' } else { '@' };
        let e = e as i128 - 1;
        if e < 0 {
            let _ = write!(mstr, "{}-{}", sep, e.unsigned_abs());
        } else {
            let _ = write!(mstr, "{}+{}", sep, e);
        }

        Ok(mstr)
    }

    /// Sets `self` to the number in the string `s` with digits in the base `|base|`, rounded
    /// using the rounding mode `rm`. Returns the ternary value.
    /// See `to_string_radix` for the accepted form. `inf`, `nan`, `@inf@` and `@nan@` are accepted
    /// in any letter case, and the number can be surrounded by whitespace.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the base is not in 2..=62 or -36..=-2, or `s` is not a number.
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn set_str(&mut self, s: &str, base: i32, rm: RoundingMode) -> Result<i32, Error> {
        let b = check_base(base)?;
        let ps = parse(s, b)?;

        if ps.is_nan() {
            self.kind = Kind::Nan;
            self.s = ps.sign();
            return Ok(0);
        }
        if ps.is_inf() {
            self.set_inf(ps.sign());
            return Ok(0);
        }

        let (sign, digits, e) = ps.raw_parts();
        let e = e.clamp(Exponent::MIN as i128, Exponent::MAX as i128) as Exponent;
        self.from_digits(sign, digits, base, e, rm)
    }
}

impl Display for BigFloat {
    /// Formats the number in base 10 with rounding to nearest. The precision of the formatter
    /// is the number of digits after the point. Without it, the number of digits is enough to
    /// read the number back without a loss.
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let n = f.precision().map(|n| n + 1).unwrap_or(0);

        // formatting does not change the flags of the computation
        let saved = flags();
        let s = self.to_string_radix(10, n, RoundingMode::ToEven);
        set_flags(saved);

        f.write_str(&s.map_err(|_| core::fmt::Error)?)
    }
}

impl FromStr for BigFloat {
    type Err = Error;

    /// Parses a decimal number with the default precision and rounding mode.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ret = BigFloat::new(DEFAULT_P)?;
        ret.set_str(s, 10, DEFAULT_RM)?;
        Ok(ret)
    }
}
