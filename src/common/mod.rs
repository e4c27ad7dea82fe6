//! Word buffers, word-level arithmetic and static values.

pub mod buf;
pub mod consts;
pub mod util;
