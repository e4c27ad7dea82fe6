//! Exact subtraction kernel: `sign(b)·(|b| - |c|)` with a single rounding.
//!
//! The high words of the aligned operands are subtracted into the destination; the rounding
//! direction is then derived from the remaining low words of `b` and `c` compared word by word,
//! without materializing their difference.

use std::borrow::Cow;
use core::cmp::Ordering;

use crate::common::util::{add_1, low_mask, rshift, sub_1, sub_n};
use crate::defs::{RoundingMode, Sign, Word, WORD_BIT_SIZE, WORD_SIGNIFICANT_BIT};
use crate::num::{clamp_exponent, BigFloat, Kind};
use crate::ops::cmp::cmp2;
use crate::ops::round::round_raw;

/// Correction of the truncated high part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fix {
    /// Keep the truncated value; the ternary value in magnitude.
    Truncate(i32),
    AddUlp,
    SubUlp,
}

/// Aligns `src` shifting it right by `sh` bits into a buffer one word longer.
fn shifted(src: &[Word], sh: usize) -> Cow<'_, [Word]> {
    if sh == 0 {
        Cow::Borrowed(src)
    } else {
        let mut v = vec![0; src.len() + 1];
        v[0] = rshift(&mut v[1..], src, sh);
        Cow::Owned(v)
    }
}

impl BigFloat {
    /// Sets `self` to `sign(b)·(|b| - |c|)` for regular `b` and `c`, rounded using the rounding mode `rm`.
    pub(crate) fn sub1(&mut self, b: &Self, c: &Self, rm: RoundingMode) -> i32 {
        debug_assert!(b.is_regular() && c.is_regular());

        let (ord, cancel) = cmp2(b, c);

        if ord == Ordering::Equal {
            let s = if rm == RoundingMode::Down { Sign::Neg } else { Sign::Pos };
            self.set_zero(s);
            return 0;
        }

        let (b, c, s) = if ord == Ordering::Less { (c, b, b.s.invert()) } else { (b, c, b.s) };

        self.kind = Kind::Regular;
        self.s = s;

        let exp_b = b.e;
        let diff_exp = (b.e as i128 - c.e as i128) as u128;
        let aq = self.p;

        if (aq.max(b.p) + 2) as u128 <= diff_exp {
            return self.sub1_c_small(b, rm);
        }

        // faithful rounding truncates
        let rmm = match rm.to_magnitude(s) {
            RoundingMode::Faithful => RoundingMode::ToZero,
            r => r,
        };

        let an = self.m.len();

        // b aligned with the result
        let shift_b = ((WORD_BIT_SIZE as u64 - cancel % WORD_BIT_SIZE as u64) % WORD_BIT_SIZE as u64) as usize;
        let cancel1 = ((cancel + shift_b as u64) / WORD_BIT_SIZE as u64) as usize;
        let bp = shifted(&b.m, shift_b);
        let bn = bp.len();

        // c aligned with the result
        let shift_c = ((diff_exp as i128 - cancel as i128).rem_euclid(WORD_BIT_SIZE as i128)) as usize;
        let cp = shifted(&c.m, shift_c);
        let cn = cp.len();

        // number of high words of c to skip, negative if c starts below the result
        let cancel2: isize = if cancel as u128 >= diff_exp {
            ((cancel as u128 - diff_exp + WORD_BIT_SIZE as u128 - 1) / WORD_BIT_SIZE as u128) as isize
        } else {
            -(((diff_exp - cancel as u128) / WORD_BIT_SIZE as u128) as isize)
        };

        let ap = &mut self.m[..];

        // high part of b
        if an + cancel1 <= bn {
            ap.copy_from_slice(&bp[bn - (an + cancel1)..bn - cancel1]);
        } else if cancel1 < bn {
            let z = an + cancel1 - bn;
            ap[..z].fill(0);
            ap[z..].copy_from_slice(&bp[..bn - cancel1]);
        } else {
            ap.fill(0);
        }

        // subtract high part of c
        let ani = an as isize;
        if ani + cancel2 > 0 {
            if cancel2 >= 0 {
                let c2 = cancel2 as usize;
                if an + c2 <= cn {
                    sub_n(ap, &cp[cn - (an + c2)..cn - c2]);
                } else if cn > c2 {
                    let off = an + c2 - cn;
                    sub_n(&mut ap[off..], &cp[..cn - c2]);
                }
            } else {
                let k = (-cancel2) as usize;
                let top = an - k;
                let borrow = if top <= cn {
                    sub_n(&mut ap[..top], &cp[cn - top..])
                } else {
                    sub_n(&mut ap[top - cn..top], &cp[..])
                };
                sub_1(&mut ap[top..], borrow);
            }
        }

        let sh = an * WORD_BIT_SIZE - aq;
        let carry = ap[0] & low_mask(sh);
        ap[0] -= carry;

        let lsb_set = (ap[0] >> sh) & 1 == 1;
        let bn_low = bn as isize - (an + cancel1) as isize;
        let cn_low = cn as isize - (ani + cancel2);
        let fix = round_low_words(rmm, sh, carry, lsb_set, &bp, bn_low, &cp, cn_low);

        let mut add_exp = 0;
        let inex = match fix {
            Fix::SubUlp => {
                sub_1(ap, 1 << sh);
                -1
            }
            Fix::AddUlp => {
                if add_1(ap, 1 << sh) != 0 {
                    ap[an - 1] = WORD_SIGNIFICANT_BIT;
                    add_exp = 1;
                }
                1
            }
            Fix::Truncate(t) => t,
        };
        debug_assert!(ap[an - 1] & WORD_SIGNIFICANT_BIT != 0);

        self.e = clamp_exponent(exp_b as i128 - cancel as i128 + add_exp);
        self.check_range(inex * s.to_int(), rm)
    }

    // c is below the rounding position of the result and of b, and is never read
    fn sub1_c_small(&mut self, b: &Self, rm: RoundingMode) -> i32 {
        let s = self.s;
        let rm = if rm == RoundingMode::Faithful { RoundingMode::ToZero } else { rm };

        let aq = self.p;
        let (mut inex, carry) = round_raw(&mut self.m, aq, &b.m, false, s, rm);
        let mut exp_a = b.e as i128 + carry as i128;

        if inex == 0 && !rm.is_like_to_zero(s) {
            // the result equals b, and the exact value is slightly below it
            inex = 1;
        } else if inex != 0 && inex != 2 {
            // b was rounded, and subtracting c does not cross a rounding boundary
        } else {
            // either truncation of b - c, or a tie rounded away while the exact value is below the tie:
            // take the preceding value
            let sh = self.unused_bits();
            let an = self.m.len();
            sub_1(&mut self.m, 1 << sh);
            if self.m[an - 1] & WORD_SIGNIFICANT_BIT == 0 {
                exp_a -= 1;
                self.m[an - 1] |= WORD_SIGNIFICANT_BIT;
            }
            inex = -1;
        }

        self.e = clamp_exponent(exp_a);
        self.check_range(inex.signum() * s.to_int(), rm)
    }
}

/// Decides the correction of the truncated high part from the `sh` discarded bits `carry`
/// and the low words of aligned `b` and `c`, consumed from the most significant one.
/// `rm` is `ToZero`, `FromZero` or `ToEven`.
#[allow(clippy::too_many_arguments)]
fn round_low_words(
    rm: RoundingMode,
    sh: usize,
    carry: Word,
    lsb_set: bool,
    bp: &[Word],
    mut bn: isize,
    cp: &[Word],
    mut cn: isize,
) -> Fix {
    // 0: low(b) = low(c) so far; negative: low(b) < low(c); positive: low(b) > low(c),
    // and 2 if the difference is exactly a half of the last bit so far
    let mut cmp_low: i32 = 0;

    if rm == RoundingMode::ToEven {
        if sh > 0 {
            let half: Word = 1 << (sh - 1);
            if carry > half {
                return Fix::AddUlp;
            } else if carry > 0 && carry < half {
                return Fix::Truncate(-1);
            }
            cmp_low = if carry == 0 { 0 } else { 2 };
        }
    } else if carry != 0 {
        return if rm == RoundingMode::ToZero { Fix::Truncate(-1) } else { Fix::AddUlp };
    }

    let cn0 = cp.len() as isize;
    let mut k = 0;
    while bn > 0 || cn > 0 {
        let mut bb = if bn > 0 {
            bn -= 1;
            bp[bn as usize]
        } else {
            0
        };
        let mut cc = if cn > 0 {
            cn -= 1;
            if cn < cn0 {
                cp[cn as usize]
            } else {
                0
            }
        } else {
            0
        };

        if cmp_low == 0 {
            cmp_low = match bb.cmp(&cc) {
                Ordering::Less => -2 + k,
                Ordering::Greater => 1,
                Ordering::Equal => 0,
            };
        }

        // to nearest with no spare bits: the first low word carries the half of the last bit
        if rm == RoundingMode::ToEven && sh == 0 && k == 0 {
            let half = WORD_SIGNIFICANT_BIT;
            if cmp_low < 0 {
                if cc >= half {
                    cc -= half;
                } else {
                    bb += half;
                }
            } else {
                if cc < half {
                    cc += half;
                } else {
                    bb -= half;
                }
                if cmp_low > 0 {
                    cmp_low = 2;
                }
            }
        }

        if cmp_low < 0 {
            match rm {
                RoundingMode::ToZero => return Fix::SubUlp,
                RoundingMode::FromZero => return Fix::Truncate(1),
                _ => {
                    if bb > cc || sh > 0 || cmp_low == -1 {
                        return Fix::Truncate(1);
                    } else if bb < cc {
                        return Fix::SubUlp;
                    }
                }
            }
        } else if cmp_low > 0 {
            match rm {
                RoundingMode::ToZero => return Fix::Truncate(-1),
                RoundingMode::FromZero => return Fix::AddUlp,
                _ => {
                    if bb > cc {
                        return if cmp_low == 2 { Fix::AddUlp } else { Fix::Truncate(-1) };
                    } else if bb < cc {
                        return Fix::Truncate(-1);
                    }
                }
            }
        }

        k = 1;
    }

    if rm == RoundingMode::ToEven && cmp_low != 0 {
        // exactly halfway
        if lsb_set {
            if cmp_low < 0 {
                Fix::SubUlp
            } else {
                Fix::AddUlp
            }
        } else {
            Fix::Truncate(if cmp_low > 0 { -1 } else { 1 })
        }
    } else {
        Fix::Truncate(0)
    }
}
