//! Properties which hold for every finite input and every rounding mode.

mod props;
