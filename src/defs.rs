//! Definitions.

use core::fmt::Display;

use smallvec::CollectionAllocErr;

/// A word.
pub type Word = u64;

/// Doubled word.
pub type DoubleWord = u128;

/// An exponent.
pub type Exponent = i64;

/// Size of a word in bits.
pub const WORD_BIT_SIZE: usize = core::mem::size_of::<Word>() * 8;

/// Maximum value of a word.
pub const WORD_MAX: Word = Word::MAX;

/// Base of words.
pub const WORD_BASE: DoubleWord = WORD_MAX as DoubleWord + 1;

/// Word with the most significant bit set.
pub const WORD_SIGNIFICANT_BIT: Word = WORD_MAX << (WORD_BIT_SIZE - 1);

/// The smallest exponent the exponent range can be extended to.
pub const EXPONENT_MIN: Exponent = 1 - (1 << 62);

/// The largest exponent the exponent range can be extended to.
pub const EXPONENT_MAX: Exponent = (1 << 62) - 1;

/// Default lower bound of the exponent range.
pub const DEFAULT_EMIN: Exponent = 1 - (1 << 30);

/// Default upper bound of the exponent range.
pub const DEFAULT_EMAX: Exponent = (1 << 30) - 1;

/// Minimum precision in bits.
pub const PREC_MIN: usize = 1;

/// Maximum precision in bits.
pub const PREC_MAX: usize = isize::MAX as usize - 256;

/// Default rounding mode.
pub const DEFAULT_RM: RoundingMode = RoundingMode::ToEven;

/// Default precision.
pub const DEFAULT_P: usize = 53;

/// Sign.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Sign {
    /// Negative.
    Neg = -1,

    /// Positive.
    Pos = 1,
}

impl Sign {
    /// Changes the sign to the opposite.
    pub fn invert(&self) -> Self {
        match *self {
            Sign::Pos => Sign::Neg,
            Sign::Neg => Sign::Pos,
        }
    }

    /// Returns true if `self` is positive.
    pub fn is_positive(&self) -> bool {
        *self == Sign::Pos
    }

    /// Returns true if `self` is negative.
    pub fn is_negative(&self) -> bool {
        *self == Sign::Neg
    }

    /// Returns 1 for the positive sign and -1 for the negative sign.
    pub fn to_int(&self) -> i32 {
        *self as i32
    }
}

/// Possible errors.
///
/// Floating point exceptions (overflow, invalid operation, etc.) are not errors: they are
/// reported through the sticky exception flags and the ternary value of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Invalid argument: precision, radix, or a malformed digit string.
    InvalidArgument,

    /// The requested exponent range is empty or exceeds the absolute limits.
    InvalidExponentRange,

    /// Memory allocation error.
    MemoryAllocation,
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let repr = match self {
            Error::InvalidArgument => "invalid argument",
            Error::InvalidExponentRange => "invalid exponent range",
            Error::MemoryAllocation => "memory allocation error",
        };
        f.write_str(repr)
    }
}

impl std::error::Error for Error {}

impl From<CollectionAllocErr> for Error {
    fn from(_: CollectionAllocErr) -> Self {
        Error::MemoryAllocation
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::MemoryAllocation
    }
}

/// Rounding modes.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum RoundingMode {
    /// Round to nearest, ties to even.
    ToEven,

    /// Round toward zero.
    ToZero,

    /// Round toward positive infinity.
    Up,

    /// Round toward negative infinity.
    Down,

    /// Round away from zero.
    FromZero,

    /// Faithful rounding: either of the two neighbouring values may be returned.
    Faithful,
}

impl RoundingMode {
    /// All rounding modes which produce a deterministic result.
    pub const DIRECTED_AND_NEAREST: [RoundingMode; 5] = [
        RoundingMode::ToEven,
        RoundingMode::ToZero,
        RoundingMode::Up,
        RoundingMode::Down,
        RoundingMode::FromZero,
    ];

    /// Returns true if rounding with `self` a value of the sign `s` decreases its magnitude.
    #[inline]
    pub fn is_like_to_zero(&self, s: Sign) -> bool {
        match self {
            RoundingMode::ToZero => true,
            RoundingMode::Up => s.is_negative(),
            RoundingMode::Down => s.is_positive(),
            _ => false,
        }
    }

    /// Returns true if rounding with `self` a value of the sign `s` increases its magnitude.
    #[inline]
    pub fn is_like_from_zero(&self, s: Sign) -> bool {
        match self {
            RoundingMode::FromZero => true,
            RoundingMode::Up => s.is_positive(),
            RoundingMode::Down => s.is_negative(),
            _ => false,
        }
    }

    /// Returns the mode which rounds the negated value the way `self` rounds the value itself.
    #[inline]
    pub fn invert(&self) -> Self {
        match self {
            RoundingMode::Up => RoundingMode::Down,
            RoundingMode::Down => RoundingMode::Up,
            rm => *rm,
        }
    }

    /// Converts a directed mode to `ToZero` or `FromZero` for a value of the sign `s`.
    /// `ToEven` and `Faithful` are returned unchanged.
    #[inline]
    pub fn to_magnitude(&self, s: Sign) -> Self {
        if self.is_like_to_zero(s) {
            RoundingMode::ToZero
        } else if self.is_like_from_zero(s) {
            RoundingMode::FromZero
        } else {
            *self
        }
    }
}
