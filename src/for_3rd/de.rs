//! Deserialization of BigFloat.

use core::fmt::Formatter;

use crate::defs::{DEFAULT_P, DEFAULT_RM, PREC_MAX};
use crate::num::BigFloat;
use serde::de::Error;
use serde::de::Visitor;
use serde::{Deserialize, Deserializer};

pub struct BigFloatVisitor {}

impl<'de> Deserialize<'de> for BigFloat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BigFloatVisitor {})
    }
}

impl<'de> Visitor<'de> for BigFloatVisitor {
    type Value = BigFloat;

    fn expecting(&self, formatter: &mut Formatter) -> core::fmt::Result {
        write!(formatter, "except `String`, `Number`")
    }

    fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
        match BigFloat::from_u64(v, 64) {
            Ok(o) => Ok(o),
            Err(e) => Err(Error::custom(format!("{e:?}"))),
        }
    }

    fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
        match BigFloat::from_i64(v, 64) {
            Ok(o) => Ok(o),
            Err(e) => Err(Error::custom(format!("{e:?}"))),
        }
    }

    fn visit_f64<E: Error>(self, v: f64) -> Result<Self::Value, E> {
        match BigFloat::from_f64(v, 53) {
            Ok(o) => Ok(o),
            Err(e) => Err(Error::custom(format!("{e:?}"))),
        }
    }

    // The precision holds every digit of the string.
    fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
        let p = ((v.len() as f64 * core::f64::consts::LOG2_10).ceil() as usize).clamp(DEFAULT_P, PREC_MAX);
        let mut ret = BigFloat::new(p).map_err(|e| Error::custom(format!("{e:?}")))?;
        match ret.set_str(v, 10, DEFAULT_RM) {
            Ok(_) => Ok(ret),
            Err(e) => Err(Error::custom(format!("{e:?}"))),
        }
    }

    fn visit_string<E: Error>(self, v: String) -> Result<Self::Value, E> {
        self.visit_str(&v)
    }
}
