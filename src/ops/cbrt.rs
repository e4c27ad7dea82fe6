//! Cube root.

use crate::defs::RoundingMode;
use crate::num::{BigFloat, Kind};

impl BigFloat {
    /// Sets `self` to the cube root of `x` rounded using the rounding mode `rm`.
    /// Returns the ternary value. The sign of the result is the sign of `x`.
    pub fn cbrt(&mut self, x: &Self, rm: RoundingMode) -> i32 {
        match x.kind {
            Kind::Nan => {
                self.set_nan();
                0
            }
            Kind::Inf => {
                self.set_inf(x.s);
                0
            }
            Kind::Zero => {
                self.set_zero(x.s);
                0
            }
            Kind::Regular => {
                let (n, l) = x.significand_and_lsb();

                let mut sh = (3 * (self.p + 2)).saturating_sub(n.bits() as usize);
                sh += (l - sh as i128).rem_euclid(3) as usize;
                let m = n << sh;
                let r = m.cbrt();
                let exact = &r * &r * &r == m;

                self.set_natural(&r, (l - sh as i128) / 3, !exact, x.s, rm)
            }
        }
    }
}
