//! Deserializers for fields an LLM fills in loosely.
//!
//! Numbers arrive as `1200`, `1200.0`, `"1,200"`, `"£1,200/month"` or
//! `"~1.2k"`; text fields sometimes arrive as bare numbers.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;

use crate::tier::PackageTier;

/// Parses the first number in a human-formatted string.
///
/// Thousands separators and currency symbols are ignored; a trailing `k` or
/// `m` suffix scales the value. Returns `None` when no digits are present.
#[must_use]
pub fn parse_loose_u64(input: &str) -> Option<u64> {
    let lowered = input.trim().to_lowercase();
    let start = lowered.find(|c: char| c.is_ascii_digit())?;
    let rest = &lowered[start..];
    let mut digits = String::new();
    let mut suffix = None;
    for c in rest.chars() {
        match c {
            '0'..='9' | '.' => digits.push(c),
            ',' => {}
            'k' | 'm' => {
                suffix = Some(c);
                break;
            }
            _ => break,
        }
    }
    let value: f64 = digits.trim_end_matches('.').parse().ok()?;
    let scaled = match suffix {
        Some('k') => value * 1_000.0,
        Some('m') => value * 1_000_000.0,
        _ => value,
    };
    float_to_u64(scaled)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn float_to_u64(value: f64) -> Option<u64> {
    if !value.is_finite() || value < 0.0 || value > u64::MAX as f64 {
        return None;
    }
    Some(value.round() as u64)
}

struct LooseU64;

impl<'de> Visitor<'de> for LooseU64 {
    type Value = Option<u64>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(u64::try_from(v).ok())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(float_to_u64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(parse_loose_u64(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(LooseU64)
    }
}

/// `Option<u64>` accepting numbers or numeric strings; unparseable text is `None`.
pub fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    d.deserialize_any(LooseU64)
}

/// `u64` accepting numbers or numeric strings; unparseable text is `0`.
pub fn u64_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(d.deserialize_any(LooseU64)?.unwrap_or(0))
}

/// Any `Default` type, with `null` read as the default.
pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// `f64` accepting numbers or strings such as `"3.5x"`; `null` is `0`.
pub fn f64_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }
    Ok(match Option::<Raw>::deserialize(d)? {
        None => 0.0,
        Some(Raw::Num(n)) if n.is_finite() => n,
        Some(Raw::Num(_)) => 0.0,
        Some(Raw::Text(s)) => {
            let cleaned: String = s
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            cleaned.parse().unwrap_or(0.0)
        }
    })
}

/// `String` accepting text, numbers or booleans; `null` is empty.
pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }
    Ok(match Option::<Raw>::deserialize(d)? {
        None => String::new(),
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(n)) => n.to_string(),
        Some(Raw::Bool(b)) => b.to_string(),
    })
}

/// `Vec<String>` that also accepts a single string or array items that are
/// objects with a `title`/`text`/`name` member. `null`, as the list or as an
/// item, contributes nothing.
pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Item {
        Text(String),
        Num(f64),
        Obj(serde_json::Map<String, serde_json::Value>),
    }
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<Option<Item>>),
    }
    let items = match Option::<Raw>::deserialize(d)? {
        None => Vec::new(),
        Some(Raw::One(s)) => vec![Item::Text(s)],
        Some(Raw::Many(v)) => v.into_iter().flatten().collect(),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Item::Text(s) => Some(s),
            Item::Num(n) => Some(n.to_string()),
            Item::Obj(map) => ["title", "text", "name", "step", "description"]
                .iter()
                .find_map(|k| map.get(*k).and_then(|v| v.as_str()).map(str::to_string)),
        })
        .filter(|s| !s.trim().is_empty())
        .collect())
}

/// `Option<PackageTier>` that maps unrecognised labels to `None`.
pub fn opt_tier<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PackageTier>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok()))
}
