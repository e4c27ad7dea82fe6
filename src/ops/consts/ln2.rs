//! ln(2)

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::One;

use crate::ops::series::Bounds;

// ln(2) = 2 atanh(1/3) = 2/3 × sum(1 / ((2k + 1) × 9^k)).
//
// For the range [a, b) of terms, x(a, b) = sum(1 / ((2k + 1) × 9^(k - a))) = p / (r × 9^(b - a - 1)),
// where r is the product of all 2k + 1.

fn pow9(n: usize) -> BigUint {
    BigUint::from(9u8).pow(n as u32)
}

fn pr(a: usize, b: usize) -> (BigUint, BigUint) {
    if a == b - 1 {
        (BigUint::one(), BigUint::from(2 * a + 1))
    } else {
        let m = (a + b) / 2;
        let (pa, ra) = pr(a, m);
        let (pb, rb) = pr(m, b);
        merge(&pa, &ra, &pb, &rb, b - m)
    }
}

// x(a, b) = x(a, m) + x(m, b) / 9^(m - a)
fn merge(pa: &BigUint, ra: &BigUint, pb: &BigUint, rb: &BigUint, nb: usize) -> (BigUint, BigUint) {
    (pa * rb * pow9(nb) + pb * ra, ra * rb)
}

/// Holds the partial sum of the series for ln(2) and the most precise enclosure computed so far.
#[derive(Debug)]
pub(crate) struct Ln2Cache {
    b: usize,
    pk: BigUint,
    rk: BigUint,
    val: Option<Bounds>,
}

impl Ln2Cache {
    pub fn new() -> Self {
        let (pk, rk) = pr(0, 1);
        Ln2Cache {
            b: 1,
            pk,
            rk,
            val: None,
        }
    }

    // extends the partial sum to 2b terms
    fn pr_inc(&mut self) {
        let (pb, rb) = pr(self.b, 2 * self.b);
        let (p, r) = merge(&self.pk, &self.rk, &pb, &rb, self.b);
        self.pk = p;
        self.rk = r;
        self.b *= 2;
    }

    /// Returns the enclosure of ln(2) at the scale `s`.
    pub fn for_scale(&mut self, s: usize) -> Bounds {
        if let Some(v) = &self.val {
            if v.s >= s {
                return v.rescale(s);
            }
        }

        // the remainder of the series after b terms is less than 9^-b, and 9^b > 2^(3.16 × b)
        let terms = (s + 2) * 100 / 316 + 1;
        while self.b < terms {
            self.pr_inc();
        }

        let num = BigInt::from(&self.pk << (s + 1));
        let den = BigInt::from(&self.rk * pow9(self.b - 1) * 3u32);
        let lo = num.div_floor(&den);
        let hi = &lo + 2u32;

        log::trace!("ln(2) computed at scale {} with {} terms", s, self.b);

        let ret = Bounds { lo, hi, s };
        self.val = Some(ret.clone());
        ret
    }
}
