//! Fixed-point math utilities for deterministic rules evaluation.
//!
//! All combat and progression arithmetic uses fixed-point numbers so that
//! every client computes bit-identical outcomes. Floating-point values only
//! appear at the edges: authoring rule tables and printing reports.

use fixed::types::I32F32;

/// Fixed-point number type for all rules math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Convert a decimal table value into fixed-point.
///
/// Intended for rule-table authoring (`ratio(0.2)` for a +20% effect).
/// The conversion rounds to the nearest representable value, so the same
/// literal always yields the same bits.
#[must_use]
pub fn ratio(value: f64) -> Fixed {
    Fixed::from_num(value)
}

/// Serde support for fixed-point numbers.
///
/// Human-readable formats (RON, JSON) carry a decimal number so rule files
/// stay editable. A value that `f64` cannot hold exactly (large magnitudes
/// with many fractional bits) is written as its exact decimal string
/// instead. Binary formats carry the raw bit representation (i64) to
/// preserve exact precision across snapshots.
pub mod fixed_serde {
    use std::fmt;

    use super::Fixed;
    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            let approx = value.to_num::<f64>();
            if Fixed::checked_from_num(approx) == Some(*value) {
                approx.serialize(serializer)
            } else {
                serializer.serialize_str(&value.to_string())
            }
        } else {
            value.to_bits().serialize(serializer)
        }
    }

    /// Deserialize a fixed-point number.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(DecimalVisitor)
        } else {
            let bits = i64::deserialize(deserializer)?;
            Ok(Fixed::from_bits(bits))
        }
    }

    struct DecimalVisitor;

    fn out_of_range<E: de::Error>(value: impl fmt::Display) -> E {
        E::custom(format!("{value} is outside fixed-point range"))
    }

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Fixed;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal number or decimal string")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Fixed, E> {
            Fixed::checked_from_num(value).ok_or_else(|| out_of_range(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Fixed, E> {
            Fixed::checked_from_num(value).ok_or_else(|| out_of_range(value))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Fixed, E> {
            Fixed::checked_from_num(value).ok_or_else(|| out_of_range(value))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Fixed, E> {
            value
                .parse::<Fixed>()
                .map_err(|e| E::custom(format!("invalid decimal '{value}': {e}")))
        }
    }
}

/// Serde support for string-keyed maps of fixed-point values (effect maps).
pub mod fixed_map_serde {
    use std::collections::BTreeMap;

    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    struct Value(#[serde(with = "super::fixed_serde")] Fixed);

    /// Serialize a map of fixed-point values.
    pub fn serialize<S>(map: &BTreeMap<String, Fixed>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(map.iter().map(|(key, value)| (key, Value(*value))))
    }

    /// Deserialize a map of fixed-point values.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, Fixed>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|(key, value)| (key, value.0)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "fixed_serde")]
        value: Fixed,
        #[serde(with = "fixed_map_serde")]
        effects: BTreeMap<String, Fixed>,
    }

    fn sample() -> Sample {
        let mut effects = BTreeMap::new();
        effects.insert("food_production".to_string(), ratio(0.2));
        Sample {
            value: Fixed::from_num(1) / Fixed::from_num(3),
            effects,
        }
    }

    #[test]
    fn test_ratio_is_stable() {
        assert_eq!(ratio(0.2), ratio(0.2));
        assert_eq!(ratio(1.5), Fixed::from_num(3) / Fixed::from_num(2));
    }

    #[test]
    fn test_binary_format_keeps_exact_bits() {
        let original = sample();
        let bytes = bincode::serialize(&original).unwrap();
        let decoded: Sample = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_human_readable_format_is_decimal() {
        let text = ron::to_string(&sample()).unwrap();
        assert!(text.contains("food_production"));
        assert!(
            !text.contains(&ratio(0.2).to_bits().to_string()),
            "expected decimal output, got {text}"
        );

        let decoded: Sample = ron::from_str(&text).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_human_readable_format_keeps_large_values_exact() {
        let original = Sample {
            value: Fixed::MAX,
            effects: BTreeMap::from([("big".to_string(), Fixed::from_bits(0x1234_5678_9abc_def1))]),
        };
        let text = ron::to_string(&original).unwrap();
        let decoded: Sample = ron::from_str(&text).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_integer_literal_accepted() {
        let decoded: Sample = ron::from_str(r#"(value: 2, effects: {})"#).unwrap();
        assert_eq!(decoded.value, Fixed::from_num(2));
    }
}
