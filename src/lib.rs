//! Crfloat implements binary floating point numbers of an arbitrary precision with correct rounding.
//!
//! Every operation writes its result into the receiver, rounds it to the receiver's precision
//! in one of the rounding modes, and returns a ternary value which tells the direction of the
//! rounding. Exceptions (overflow, underflow, invalid operation, inexact result, division by
//! zero) are reported through sticky per-thread flags, and the exponent range is a per-thread
//! setting as well.
//!
//! ## Examples
//!
//! ```
//! use crfloat::{BigFloat, RoundingMode, flags, clear_flags, ExceptionFlags};
//!
//! let x = BigFloat::from_f64(0.05, 53)?;
//!
//! // (1 + 5%)^10 with 20 bits of precision
//! let mut y = BigFloat::new(20)?;
//! clear_flags();
//! let t = y.compound_si(&x, 10, RoundingMode::ToEven)?;
//!
//! assert!(t != 0);
//! assert!(flags().contains(ExceptionFlags::INEXACT));
//! assert_eq!(format!("{:.4}", y), "1.6289e+0");
//! # Ok::<(), crfloat::Error>(())
//! ```
#![deny(missing_docs)]
#![deny(clippy::suspicious)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::module_inception)]

mod common;
mod conv;
pub mod ctx;
mod defs;
mod flags;
mod num;
mod ops;
mod parser;
mod strop;

#[cfg(feature = "serde")]
mod for_3rd;

pub use crate::defs::Error;
pub use crate::defs::Exponent;
pub use crate::defs::RoundingMode;
pub use crate::defs::Sign;
pub use crate::defs::Word;
pub use crate::num::BigFloat;
pub use crate::num::Kind;

pub use crate::defs::DEFAULT_EMAX;
pub use crate::defs::DEFAULT_EMIN;
pub use crate::defs::DEFAULT_P;
pub use crate::defs::DEFAULT_RM;
pub use crate::defs::EXPONENT_MAX;
pub use crate::defs::EXPONENT_MIN;
pub use crate::defs::PREC_MAX;
pub use crate::defs::PREC_MIN;
pub use crate::defs::WORD_BIT_SIZE;

pub use crate::flags::clear;
pub use crate::flags::clear_flags;
pub use crate::flags::emax;
pub use crate::flags::emax_max;
pub use crate::flags::emin;
pub use crate::flags::emin_min;
pub use crate::flags::flags;
pub use crate::flags::raise;
pub use crate::flags::set_emax;
pub use crate::flags::set_emin;
pub use crate::flags::set_flags;
pub use crate::flags::ExceptionFlags;

pub use crate::ops::round::can_round_raw;
pub use crate::ops::round::round_p;
