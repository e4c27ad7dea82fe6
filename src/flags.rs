//! Thread-scoped computation state: sticky exception flags and the exponent range.
//!
//! Each thread has its own flags and exponent range. They are only changed by the
//! operations executed on that thread, and flags are only cleared explicitly.

use core::cell::Cell;

use bitflags::bitflags;

use crate::defs::{Error, Exponent, DEFAULT_EMAX, DEFAULT_EMIN, EXPONENT_MAX, EXPONENT_MIN};

bitflags! {
    /// Sticky exception flags.
    #[derive(Default)]
    pub struct ExceptionFlags: u32 {
        /// Underflow: the exact result was nonzero and below the exponent range.
        const UNDERFLOW = 1;
        /// Overflow: the exact result was above the exponent range.
        const OVERFLOW = 2;
        /// Invalid operation: the result is NaN.
        const INVALID = 4;
        /// The result is not equal to the exact result.
        const INEXACT = 8;
        /// A value could not be represented in the requested type (comparisons with NaN included).
        const ERANGE = 16;
        /// An exact infinite result was produced from finite operands.
        const DIVBY0 = 32;
    }
}

#[derive(Clone, Copy, Debug)]
struct State {
    flags: ExceptionFlags,
    emin: Exponent,
    emax: Exponent,
}

thread_local! {
    static STATE: Cell<State> = Cell::new(State {
        flags: ExceptionFlags::empty(),
        emin: DEFAULT_EMIN,
        emax: DEFAULT_EMAX,
    });
}

#[inline]
fn state() -> State {
    STATE.with(|s| s.get())
}

#[inline]
fn update<F: FnOnce(&mut State)>(f: F) {
    STATE.with(|s| {
        let mut st = s.get();
        f(&mut st);
        s.set(st);
    })
}

/// Returns the exception flags raised on the current thread.
pub fn flags() -> ExceptionFlags {
    state().flags
}

/// Replaces the exception flags of the current thread.
pub fn set_flags(f: ExceptionFlags) {
    update(|s| s.flags = f);
}

/// Clears all exception flags of the current thread.
pub fn clear_flags() {
    set_flags(ExceptionFlags::empty());
}

/// Raises the exception flags `f`.
#[inline]
pub fn raise(f: ExceptionFlags) {
    update(|s| s.flags |= f);
}

/// Clears the exception flags `f` only.
pub fn clear(f: ExceptionFlags) {
    update(|s| s.flags.remove(f));
}

/// Returns the smallest exponent of the current exponent range.
#[inline]
pub fn emin() -> Exponent {
    state().emin
}

/// Returns the largest exponent of the current exponent range.
#[inline]
pub fn emax() -> Exponent {
    state().emax
}

/// The smallest value `set_emin` accepts.
pub fn emin_min() -> Exponent {
    EXPONENT_MIN
}

/// The largest value `set_emax` accepts.
pub fn emax_max() -> Exponent {
    EXPONENT_MAX
}

/// Sets the smallest exponent of the current exponent range.
///
/// ## Errors
///
///  - InvalidExponentRange: `e` is outside of the absolute exponent limits, or greater than the current maximum exponent.
pub fn set_emin(e: Exponent) -> Result<(), Error> {
    if !(EXPONENT_MIN..=EXPONENT_MAX).contains(&e) || e > emax() {
        return Err(Error::InvalidExponentRange);
    }
    update(|s| s.emin = e);
    Ok(())
}

/// Sets the largest exponent of the current exponent range.
///
/// ## Errors
///
///  - InvalidExponentRange: `e` is outside of the absolute exponent limits, or less than the current minimum exponent.
pub fn set_emax(e: Exponent) -> Result<(), Error> {
    if !(EXPONENT_MIN..=EXPONENT_MAX).contains(&e) || e < emin() {
        return Err(Error::InvalidExponentRange);
    }
    update(|s| s.emax = e);
    Ok(())
}

/// Extended exponent range scope.
///
/// On creation it saves the flags and the exponent range of the caller, clears the flags, and
/// extends the range to the absolute limits. Internal computation then runs without
/// spurious overflow or underflow. On drop the caller's state is restored, together with the
/// flags registered with `update_flags`.
#[must_use]
pub(crate) struct ExpoGuard {
    saved: State,
}

impl ExpoGuard {
    pub fn new() -> Self {
        let saved = state();
        STATE.with(|s| {
            s.set(State {
                flags: ExceptionFlags::empty(),
                emin: EXPONENT_MIN,
                emax: EXPONENT_MAX,
            })
        });
        ExpoGuard { saved }
    }

    /// Registers flags which must survive the restoration of the caller's state.
    pub fn update_flags(&mut self, f: ExceptionFlags) {
        self.saved.flags |= f;
    }

    /// Flags raised since the scope was entered.
    pub fn inner_flags(&self) -> ExceptionFlags {
        flags()
    }

    /// Restores the caller's state and brings `y` into the caller's exponent range.
    pub fn finish(self, y: &mut crate::num::BigFloat, inex: i32, rm: crate::defs::RoundingMode) -> i32 {
        drop(self);
        y.check_range(inex, rm)
    }
}

impl Drop for ExpoGuard {
    fn drop(&mut self) {
        let saved = self.saved;
        log::trace!("restoring exponent range [{}, {}]", saved.emin, saved.emax);
        STATE.with(|s| s.set(saved));
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_flags() {
        clear_flags();
        assert!(flags().is_empty());

        raise(ExceptionFlags::INEXACT | ExceptionFlags::OVERFLOW);
        assert!(flags().contains(ExceptionFlags::OVERFLOW));
        raise(ExceptionFlags::INVALID);
        assert_eq!(
            flags(),
            ExceptionFlags::INEXACT | ExceptionFlags::OVERFLOW | ExceptionFlags::INVALID
        );

        clear(ExceptionFlags::OVERFLOW);
        assert_eq!(flags(), ExceptionFlags::INEXACT | ExceptionFlags::INVALID);

        clear_flags();
        assert!(flags().is_empty());
    }

    #[test]
    fn test_exponent_range() {
        assert_eq!(emin(), DEFAULT_EMIN);
        assert_eq!(emax(), DEFAULT_EMAX);

        assert_eq!(set_emin(EXPONENT_MIN - 1), Err(Error::InvalidExponentRange));
        assert_eq!(set_emax(EXPONENT_MAX + 1), Err(Error::InvalidExponentRange));
        assert_eq!(set_emin(DEFAULT_EMAX + 1), Err(Error::InvalidExponentRange));

        set_emin(-100).unwrap();
        set_emax(100).unwrap();
        assert_eq!((emin(), emax()), (-100, 100));

        set_emin(DEFAULT_EMIN).unwrap();
        set_emax(DEFAULT_EMAX).unwrap();
    }

    #[test]
    fn test_expo_guard() {
        clear_flags();
        raise(ExceptionFlags::INEXACT);
        set_emin(-10).unwrap();
        set_emax(10).unwrap();

        {
            let mut g = ExpoGuard::new();
            assert_eq!((emin(), emax()), (EXPONENT_MIN, EXPONENT_MAX));
            assert!(flags().is_empty());

            raise(ExceptionFlags::UNDERFLOW);
            g.update_flags(ExceptionFlags::DIVBY0);
            assert_eq!(g.inner_flags(), ExceptionFlags::UNDERFLOW);
        }

        assert_eq!((emin(), emax()), (-10, 10));
        assert_eq!(flags(), ExceptionFlags::INEXACT | ExceptionFlags::DIVBY0);

        set_emin(DEFAULT_EMIN).unwrap();
        set_emax(DEFAULT_EMAX).unwrap();
        clear_flags();
    }
}
