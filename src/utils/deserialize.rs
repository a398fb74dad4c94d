//! Serde helpers for loosely-typed feed numerics.
//!
//! Upstream feeds are inconsistent about numeric encoding: reserves and
//! supplies usually arrive as strings (they overflow f64 and u64), rates
//! arrive as JSON numbers, and `tokenId` can be a string, a number or null.
//!
//! Numbers are kept as their literal text (serde_json `arbitrary_precision`)
//! so a 27-digit reserve sent unquoted reaches `BigDecimal` intact.

use bigdecimal::BigDecimal;
use serde::{
    de::{self, value::MapAccessDeserializer, MapAccess, Visitor},
    Deserialize, Deserializer,
};
use std::{fmt, str::FromStr};

/// Literal text of a JSON string or number.
struct NumericText(String);

impl NumericText {
    fn into_decimal<E: de::Error>(self) -> Result<BigDecimal, E> {
        BigDecimal::from_str(self.0.trim())
            .map_err(|e| E::custom(format!("invalid decimal {:?}: {}", self.0, e)))
    }
}

impl<'de> Deserialize<'de> for NumericText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NumericTextVisitor)
    }
}

struct NumericTextVisitor;

impl<'de> Visitor<'de> for NumericTextVisitor {
    type Value = NumericText;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(NumericText(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(NumericText(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(NumericText(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(NumericText(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(NumericText(v.to_string()))
    }

    // arbitrary_precision hands numbers over as a single-entry map
    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let number = serde_json::Number::deserialize(MapAccessDeserializer::new(map))?;
        Ok(NumericText(number.to_string()))
    }
}

/// Deserialize a required decimal from either a JSON string or number.
pub fn decimal<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    NumericText::deserialize(deserializer)?.into_decimal()
}

/// Deserialize an optional decimal. `null` and absent fields become `None`.
pub fn opt_decimal<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumericText>::deserialize(deserializer)? {
        Some(value) => value.into_decimal().map(Some),
        None => Ok(None),
    }
}

/// Deserialize an optional identifier that may be encoded as a string or a number.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumericText>::deserialize(deserializer)?.map(|value| value.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Amounts {
        #[serde(deserialize_with = "decimal")]
        raw: BigDecimal,
        #[serde(default, deserialize_with = "opt_decimal")]
        maybe: Option<BigDecimal>,
    }

    #[test]
    fn test_unquoted_large_integer_keeps_every_digit() {
        let amounts: Amounts =
            serde_json::from_str(r#"{ "raw": 123456789012345678901234567, "maybe": 0.1 }"#).unwrap();
        assert_eq!(
            amounts.raw,
            BigDecimal::from_str("123456789012345678901234567").unwrap()
        );
        assert_eq!(amounts.maybe, Some(BigDecimal::from_str("0.1").unwrap()));
    }

    #[test]
    fn test_quoted_and_null_amounts() {
        let amounts: Amounts = serde_json::from_str(r#"{ "raw": " 42.5 ", "maybe": null }"#).unwrap();
        assert_eq!(amounts.raw, BigDecimal::from_str("42.5").unwrap());
        assert_eq!(amounts.maybe, None);
    }

    #[test]
    fn test_rejects_non_numeric_values() {
        assert!(serde_json::from_str::<Amounts>(r#"{ "raw": "lots" }"#).is_err());
        assert!(serde_json::from_str::<Amounts>(r#"{ "raw": true }"#).is_err());
    }
}
