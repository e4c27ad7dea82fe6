//! ln(10)

use num_bigint::BigUint;

use crate::ops::series::{ln_dyadic, Bounds};

/// Holds the most precise enclosure of ln(10) computed so far.
#[derive(Debug)]
pub(crate) struct Ln10Cache {
    val: Option<Bounds>,
}

impl Ln10Cache {
    pub fn new() -> Self {
        Ln10Cache { val: None }
    }

    /// Returns the cached enclosure at the scale `s` if it is wide enough.
    pub fn peek(&self, s: usize) -> Option<Bounds> {
        self.val.as_ref().filter(|v| v.s >= s).map(|v| v.rescale(s))
    }

    pub fn store(&mut self, b: Bounds) {
        if self.val.as_ref().map_or(true, |v| v.s < b.s) {
            self.val = Some(b);
        }
    }

    /// Computes the enclosure of ln(10) at the scale `s`.
    pub fn compute(s: usize) -> Bounds {
        // ln(10) = 3 ln(2) + ln(5/4)
        ln_dyadic(&BigUint::from(10u8), 0, s).rescale(s)
    }
}
