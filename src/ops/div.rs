//! Division.

use num_integer::Integer;
use num_traits::Zero;

use crate::common::util::words_to_biguint;
use crate::defs::{RoundingMode, Sign, WORD_BIT_SIZE};
use crate::flags::{raise, ExceptionFlags};
use crate::num::{BigFloat, Kind};

impl BigFloat {
    /// Sets `self` to `b / c` rounded using the rounding mode `rm`. Returns the ternary value.
    ///
    /// `0/0` and `Inf/Inf` are NaN. A nonzero number divided by zero is an infinity,
    /// and the division by zero flag is raised.
    pub fn div(&mut self, b: &Self, c: &Self, rm: RoundingMode) -> i32 {
        let s = if b.s == c.s { Sign::Pos } else { Sign::Neg };
        match (b.kind, c.kind) {
            (Kind::Nan, _) | (_, Kind::Nan) | (Kind::Inf, Kind::Inf) | (Kind::Zero, Kind::Zero) => {
                self.set_nan();
                0
            }
            (Kind::Inf, _) => {
                self.set_inf(s);
                0
            }
            (_, Kind::Inf) | (Kind::Zero, _) => {
                self.set_zero(s);
                0
            }
            (_, Kind::Zero) => {
                raise(ExceptionFlags::DIVBY0);
                self.set_inf(s);
                0
            }
            _ => {
                let nb = words_to_biguint(&b.m);
                let nc = words_to_biguint(&c.m);

                // the quotient has at least p + 2 bits, so the remainder only decides the sticky bit
                let k = (self.p as i64 + 3 + nc.bits() as i64 - nb.bits() as i64).max(0) as usize;
                let (q, r) = (nb << k).div_rem(&nc);

                let bl = b.e as i128 - (b.m.len() * WORD_BIT_SIZE) as i128;
                let cl = c.e as i128 - (c.m.len() * WORD_BIT_SIZE) as i128;
                self.set_natural(&q, bl - cl - k as i128, !r.is_zero(), s, rm)
            }
        }
    }

    /// Sets `self` to `x / u` rounded using the rounding mode `rm`.
    pub fn div_ui(&mut self, x: &Self, u: u64, rm: RoundingMode) -> i32 {
        self.div(x, &BigFloat::exact_ui(u), rm)
    }

    /// Sets `self` to `x / i` rounded using the rounding mode `rm`.
    pub fn div_si(&mut self, x: &Self, i: i64, rm: RoundingMode) -> i32 {
        self.div(x, &BigFloat::exact_si(i), rm)
    }

    /// Sets `self` to `u / x` rounded using the rounding mode `rm`.
    pub fn ui_div(&mut self, u: u64, x: &Self, rm: RoundingMode) -> i32 {
        self.div(&BigFloat::exact_ui(u), x, rm)
    }

    /// Sets `self` to `x / f` rounded using the rounding mode `rm`.
    pub fn div_d(&mut self, x: &Self, f: f64, rm: RoundingMode) -> i32 {
        self.div(x, &BigFloat::exact_d(f), rm)
    }
}
