//! Deserializers for query-string values.
//!
//! Query strings arrive as text, and `#[serde(flatten)]` prevents
//! serde_urlencoded from coercing numbers, so numeric filters go through
//! these helpers. Empty strings become `None`.

use serde::{Deserialize, Deserializer};
use std::str::FromStr;

fn deserialize_optional_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<T>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_parsed(deserializer)
}

pub fn deserialize_optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_parsed(deserializer)
}

/// Treats blank strings as absent.
pub fn deserialize_optional_trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Filters {
        #[serde(default, deserialize_with = "deserialize_optional_f64")]
        min_price: Option<f64>,
        #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
        category: Option<String>,
    }

    #[test]
    fn test_parses_numbers_from_strings() {
        let f: Filters = serde_json::from_str(r#"{"min_price":"12.5"}"#).unwrap();
        assert_eq!(f.min_price, Some(12.5));
    }

    #[test]
    fn test_blank_values_are_none() {
        let f: Filters = serde_json::from_str(r#"{"min_price":"","category":"  "}"#).unwrap();
        assert_eq!(f.min_price, None);
        assert_eq!(f.category, None);
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(serde_json::from_str::<Filters>(r#"{"min_price":"cheap"}"#).is_err());
    }
}
