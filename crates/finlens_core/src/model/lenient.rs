//! Serde helpers for upstream numeric fields
//!
//! Upstream documents carry amounts either as JSON numbers (`"units": 35.7`)
//! or as numeric strings (`"balance": "383353.02"`). Both decode to `f64`.
//! Dates arrive as RFC 3339 timestamps or as bare `YYYY-MM-DD` dates.

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn into_f64(self) -> Result<f64, String> {
        match self {
            NumberOrText::Number(n) => Ok(n),
            NumberOrText::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("expected a number, got {s:?} ({e})")),
        }
    }
}

/// Parse a loose JSON value into a finite `f64`.
///
/// Used by the normalizer, where a bad value drops the record rather than
/// failing the document.
pub fn value_to_f64(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrText::deserialize(deserializer)?
        .into_f64()
        .map_err(D::Error::custom)
}

pub mod option {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<NumberOrText>::deserialize(deserializer)?
            .map(NumberOrText::into_f64)
            .transpose()
            .map_err(D::Error::custom)
    }
}

/// Quantities, prices and balances owed, which must be finite and at least zero
pub mod non_negative {
    use super::*;

    fn check<E: serde::de::Error>(value: f64) -> Result<f64, E> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(E::custom(format!("expected a non-negative number, got {value}")))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        check(super::deserialize(deserializer)?)
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            super::super::option::deserialize(deserializer)?
                .map(check)
                .transpose()
        }
    }
}

/// RFC 3339 timestamps, or bare dates taken as midnight UTC
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if let Ok(ts) = text.parse::<Timestamp>() {
        return Some(ts);
    }
    let date = text.parse::<Date>().ok()?;
    date.to_zoned(TimeZone::UTC).ok().map(|z| z.timestamp())
}

pub mod timestamp {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(text) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        parse_timestamp(&text)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a date, got {text:?}")))
    }
}
