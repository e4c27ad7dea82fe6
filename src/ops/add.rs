//! Addition and subtraction.

use crate::common::util::words_to_biguint;
use crate::defs::{RoundingMode, Sign, WORD_BIT_SIZE};
use crate::num::{clamp_exponent, BigFloat, Kind};
use crate::ops::round::round_raw;

impl BigFloat {
    /// Sets `self` to `b + c` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// The sum of infinities of opposite signs is NaN. The exact zero sum of values of opposite
    /// signs is `-0` when rounding down, and `+0` otherwise.
    pub fn add(&mut self, b: &Self, c: &Self, rm: RoundingMode) -> i32 {
        self.add_signed(b, c, c.s, rm)
    }

    /// Sets `self` to `b - c` rounded using the rounding mode `rm`. Returns the ternary value.
    pub fn sub(&mut self, b: &Self, c: &Self, rm: RoundingMode) -> i32 {
        self.add_signed(b, c, c.s.invert(), rm)
    }

    /// Sets `self` to `x + u` rounded using the rounding mode `rm`.
    pub fn add_ui(&mut self, x: &Self, u: u64, rm: RoundingMode) -> i32 {
        self.add(x, &BigFloat::exact_ui(u), rm)
    }

    /// Sets `self` to `x + i` rounded using the rounding mode `rm`.
    pub fn add_si(&mut self, x: &Self, i: i64, rm: RoundingMode) -> i32 {
        self.add(x, &BigFloat::exact_si(i), rm)
    }

    /// Sets `self` to `x - u` rounded using the rounding mode `rm`.
    pub fn sub_ui(&mut self, x: &Self, u: u64, rm: RoundingMode) -> i32 {
        self.sub(x, &BigFloat::exact_ui(u), rm)
    }

    /// Sets `self` to `u - x` rounded using the rounding mode `rm`.
    pub fn ui_sub(&mut self, u: u64, x: &Self, rm: RoundingMode) -> i32 {
        self.sub(&BigFloat::exact_ui(u), x, rm)
    }

    /// Sets `self` to `x + f` rounded using the rounding mode `rm`.
    pub fn add_d(&mut self, x: &Self, f: f64, rm: RoundingMode) -> i32 {
        self.add(x, &BigFloat::exact_d(f), rm)
    }

    /// Sets `self` to `x - f` rounded using the rounding mode `rm`.
    pub fn sub_d(&mut self, x: &Self, f: f64, rm: RoundingMode) -> i32 {
        self.sub(x, &BigFloat::exact_d(f), rm)
    }

    // b + c, where the sign of c is replaced with cs
    fn add_signed(&mut self, b: &Self, c: &Self, cs: Sign, rm: RoundingMode) -> i32 {
        match (b.kind, c.kind) {
            (Kind::Nan, _) | (_, Kind::Nan) => {
                self.set_nan();
                0
            }
            (Kind::Inf, Kind::Inf) => {
                if b.s != cs {
                    self.set_nan();
                } else {
                    self.set_inf(b.s);
                }
                0
            }
            (Kind::Inf, _) => {
                self.set_inf(b.s);
                0
            }
            (_, Kind::Inf) => {
                self.set_inf(cs);
                0
            }
            (Kind::Zero, Kind::Zero) => {
                let s = if b.s == cs {
                    b.s
                } else if rm == RoundingMode::Down {
                    Sign::Neg
                } else {
                    Sign::Pos
                };
                self.set_zero(s);
                0
            }
            (Kind::Zero, _) => self.set4(c, rm, cs),
            (_, Kind::Zero) => self.set4(b, rm, b.s),
            _ => {
                if b.s == cs {
                    self.add1(b, c, b.s, rm)
                } else {
                    self.sub1(b, c, rm)
                }
            }
        }
    }

    /// Sets `self` to `s·(|b| + |c|)` for regular `b` and `c`.
    pub(crate) fn add1(&mut self, b: &Self, c: &Self, s: Sign, rm: RoundingMode) -> i32 {
        debug_assert!(b.is_regular() && c.is_regular());

        let (b, c) = if b.e >= c.e { (b, c) } else { (c, b) };
        let diff = (b.e as i128 - c.e as i128) as u128;

        self.kind = Kind::Regular;
        self.s = s;

        if diff >= (self.p.max(b.p) + 2) as u128 {
            // c is below a quarter of the last bit of the wider precision,
            // and only contributes a sticky bit
            let (inex, carry) = round_raw(&mut self.m, self.p, &b.m, true, s, rm);
            self.e = clamp_exponent(b.e as i128 + carry as i128);
            return self.check_range(inex.signum() * s.to_int(), rm);
        }

        let bl = b.e as i128 - (b.m.len() * WORD_BIT_SIZE) as i128;
        let cl = c.e as i128 - (c.m.len() * WORD_BIT_SIZE) as i128;
        let lsb = bl.min(cl);
        let sum = (words_to_biguint(&b.m) << (bl - lsb) as usize)
            + (words_to_biguint(&c.m) << (cl - lsb) as usize);

        self.set_natural(&sum, lsb, false, s, rm)
    }
}
