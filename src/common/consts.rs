//! Static constants.

use crate::num::BigFloat;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref ONE: BigFloat = BigFloat::exact_ui(1);
}
