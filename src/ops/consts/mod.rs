//! Mathematical constants.
//!
//! Enclosures of the constants are cached per thread, and the most precise one computed so far
//! serves all requests at smaller scales.

mod ln10;
mod ln2;

use core::cell::RefCell;

use crate::defs::{Error, RoundingMode};
use crate::flags::ExpoGuard;
use crate::num::BigFloat;
use crate::ops::consts::ln10::Ln10Cache;
use crate::ops::consts::ln2::Ln2Cache;
use crate::ops::series::Bounds;
use crate::ops::ziv::{working_prec, ziv, Attempt};

thread_local! {
    static LN2: RefCell<Ln2Cache> = RefCell::new(Ln2Cache::new());
    static LN10: RefCell<Ln10Cache> = RefCell::new(Ln10Cache::new());
}

/// Enclosure of ln(2) at the scale `s`.
pub(crate) fn ln2_bounds(s: usize) -> Bounds {
    LN2.with(|c| c.borrow_mut().for_scale(s))
}

/// Enclosure of ln(10) at the scale `s`.
pub(crate) fn ln10_bounds(s: usize) -> Bounds {
    // ln(10) needs ln(2) itself, so the caches are never borrowed at the same time
    let cached = LN10.with(|c| c.borrow().peek(s));
    match cached {
        Some(b) => b,
        None => {
            let b = Ln10Cache::compute(s);
            LN10.with(|c| c.borrow_mut().store(b.clone()));
            b
        }
    }
}

impl BigFloat {
    /// Sets `self` to ln(2) rounded using the rounding mode `rm`. Returns the ternary value,
    /// which is never zero.
    ///
    /// ## Errors
    ///
    ///  - MemoryAllocation: failed to allocate memory for intermediate values.
    pub fn const_log2(&mut self, rm: RoundingMode) -> Result<i32, Error> {
        let guard = ExpoGuard::new();
        let w0 = working_prec(self.precision(), 4);
        ziv(self, rm, guard, "const_log2", w0, |w| Attempt::from_bounds(&ln2_bounds(w), 0))
    }
}
