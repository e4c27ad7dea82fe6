//! Serialization of BigFloat.
//! Serialization to a string uses decimal radix with enough digits to read the number back.

use crate::num::BigFloat;
use serde::ser::Error;
use serde::{Serialize, Serializer};

impl Serialize for BigFloat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let saved = crate::flags::flags();
        let s = self.to_string_radix(10, 0, crate::defs::RoundingMode::ToEven);
        crate::flags::set_flags(saved);
        match s {
            Ok(s) => serializer.serialize_str(&s),
            Err(e) => Err(Error::custom(format!("{e:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::to_string;

    use crate::num::BigFloat;
    use crate::Sign;

    #[test]
    fn to_json() {
        let mut x = BigFloat::new(10).unwrap();
        x.set_zero(Sign::Pos);
        assert_eq!(to_string(&x).unwrap(), "\"0.0\"");
        assert_eq!(
            to_string(&BigFloat::from_f64(0.5, 53).unwrap()).unwrap(),
            "\"5.0000000000000000e-1\""
        );
        assert_eq!(to_string(&BigFloat::default()).unwrap(), "\"NaN\"");
    }
}
