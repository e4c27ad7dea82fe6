//! Context holds the precision and the rounding mode, and chains operations on a value.

use crate::defs::{Error, DEFAULT_P, DEFAULT_RM};
use crate::num::BigFloat;
use crate::RoundingMode;

/// Context contains default parameters for all operations, and the current value.
///
/// ## Examples
///
/// ```
/// # use crfloat::{BigFloat, RoundingMode, ctx::Context};
/// let mut ctx = Context::new();
/// ctx.precision(100).rounding_mode(RoundingMode::ToZero);
/// ctx.value(BigFloat::from_u64(2, 100)?);
///
/// ctx.sqrt()?.pow_si(2)?;
///
/// // sqrt(2) was rounded towards zero
/// assert!(ctx.get_value() < &BigFloat::from_u64(2, 100)?);
/// assert!(ctx.ternary() < 0);
/// # Ok::<(), crfloat::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    p: usize,
    rm: RoundingMode,
    value: BigFloat,
    t: i32,
}

impl Context {
    /// Create a new context with default parameters. The value is NaN.
    pub fn new() -> Self {
        Context {
            p: DEFAULT_P,
            rm: DEFAULT_RM,
            value: BigFloat::default(),
            t: 0,
        }
    }

    /// Sets the precision of the context.
    pub fn precision(&mut self, p: usize) -> &mut Self {
        self.p = p;
        self
    }

    /// Sets the rounding mode of the context.
    pub fn rounding_mode(&mut self, rm: RoundingMode) -> &mut Self {
        self.rm = rm;
        self
    }

    /// Sets the current value of the context. The value is exact.
    pub fn value(&mut self, value: BigFloat) -> &mut Self {
        self.value = value;
        self.t = 0;
        self
    }

    /// Returns the precision of the context.
    pub fn get_precision(&self) -> usize {
        self.p
    }

    /// Returns the rounding mode of the context.
    pub fn get_rounding_mode(&self) -> RoundingMode {
        self.rm
    }

    /// Returns the current value of the context.
    pub fn get_value(&self) -> &BigFloat {
        &self.value
    }

    /// Returns the ternary value of the last operation.
    pub fn ternary(&self) -> i32 {
        self.t
    }

    /// Destructures the context and returns the current value.
    pub fn into_value(self) -> BigFloat {
        self.value
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! impl_fun_rm {
    ($comment:literal, $fname:ident) => {
        #[doc=$comment]
        pub fn $fname(&mut self) -> Result<&mut Self, Error> {
            let mut r = BigFloat::new(self.p)?;
            self.t = r.$fname(&self.value, self.rm);
            self.value = r;
            Ok(self)
        }
    };
}

macro_rules! impl_fun_rm_res {
    ($comment:literal, $fname:ident) => {
        #[doc=$comment]
        pub fn $fname(&mut self) -> Result<&mut Self, Error> {
            let mut r = BigFloat::new(self.p)?;
            self.t = r.$fname(&self.value, self.rm)?;
            self.value = r;
            Ok(self)
        }
    };
}

macro_rules! impl_fun_arg_rm {
    ($comment:literal, $fname:ident) => {
        #[doc=$comment]
        pub fn $fname(&mut self, arg: &BigFloat) -> Result<&mut Self, Error> {
            let mut r = BigFloat::new(self.p)?;
            self.t = r.$fname(&self.value, arg, self.rm);
            self.value = r;
            Ok(self)
        }
    };
}

macro_rules! impl_fun_arg_rm_res {
    ($comment:literal, $fname:ident, $t:ty) => {
        #[doc=$comment]
        pub fn $fname(&mut self, arg: $t) -> Result<&mut Self, Error> {
            let mut r = BigFloat::new(self.p)?;
            self.t = r.$fname(&self.value, arg, self.rm)?;
            self.value = r;
            Ok(self)
        }
    };
}

impl Context {
    impl_fun_rm!("Replaces the value with its square root.", sqrt);
    impl_fun_rm!("Replaces the value with its cube root.", cbrt);
    impl_fun_rm!("Replaces the value with the reciprocal of its square root.", rec_sqrt);

    impl_fun_rm_res!("Replaces the value with its exponent.", exp);
    impl_fun_rm_res!("Replaces the value `x` with 2^x.", exp2);
    impl_fun_rm_res!("Replaces the value `x` with 10^x.", exp10);
    impl_fun_rm_res!("Replaces the value with its natural logarithm.", log);
    impl_fun_rm_res!("Replaces the value with its logarithm base two.", log2);
    impl_fun_rm_res!("Replaces the value `x` with ln(1 + x).", log1p);
    impl_fun_rm_res!("Replaces the value `x` with log2(1 + x).", log2p1);

    impl_fun_arg_rm!("Adds `arg` to the value.", add);
    impl_fun_arg_rm!("Subtracts `arg` from the value.", sub);
    impl_fun_arg_rm!("Multiplies the value by `arg`.", mul);
    impl_fun_arg_rm!("Divides the value by `arg`.", div);

    impl_fun_arg_rm_res!("Raises the value to the power of `arg`.", pow, &BigFloat);
    impl_fun_arg_rm_res!("Replaces the value `x` with (1 + x)^arg.", compound, &BigFloat);
    impl_fun_arg_rm_res!("Raises the value to the integer power `arg`.", pow_si, i64);
    impl_fun_arg_rm_res!("Replaces the value with its root of degree `arg`.", rootn_ui, u64);
    impl_fun_arg_rm_res!("Replaces the value `x` with (1 + x)^arg for an integer `arg`.", compound_si, i64);
}

/// Create a new context with precision `p`.
pub fn with_precision(p: usize) -> Context {
    let mut ctx = Context::new();
    ctx.precision(p);
    ctx
}

/// Create a new context with rounding mode `rm`.
pub fn with_rounding_mode(rm: RoundingMode) -> Context {
    let mut ctx = Context::new();
    ctx.rounding_mode(rm);
    ctx
}

/// Create a new context with the value `value`. The precision of the context is the precision of the value.
pub fn with_value(value: BigFloat) -> Context {
    let mut ctx = Context::new();
    ctx.precision(value.precision()).value(value);
    ctx
}
