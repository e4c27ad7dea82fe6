//! High-level operations on the numbers.

mod add;
mod cbrt;
mod cmp;
mod compound;
mod consts;
mod div;
mod exp;
mod log;
mod mul;
pub(crate) mod pow;
mod root;
pub(crate) mod round;
pub(crate) mod series;
mod sqrt;
mod sub;
pub(crate) mod ziv;
