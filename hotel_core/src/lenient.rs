//! Forgiving field decoders. The API is loose about JSON types (numbers as
//! strings, 0/1 for flags, null for empty lists), so readings degrade to
//! "missing" instead of failing the whole payload.

use serde::de::{Error, IgnoredAny};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Num(f64),
    Text(String),
    Other(IgnoredAny),
}

pub(crate) fn number<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Loose>::deserialize(de)? {
        Some(Loose::Num(n)) => Some(n),
        Some(Loose::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(Loose::Bool(b)) => Some(if b { 1.0 } else { 0.0 }),
        Some(Loose::Other(_)) | None => None,
    };
    Ok(value.filter(|n| n.is_finite()))
}

/// Integer id, also accepted as a numeric string. Unlike readings, an id
/// that cannot be read is an error: rows without one cannot be addressed.
pub(crate) fn id<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Loose::deserialize(de)? {
        Loose::Num(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => Some(n as i64),
        Loose::Text(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| D::Error::custom("id must be an integer or a numeric string"))
}

pub(crate) fn flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(de)? {
        Some(Loose::Bool(b)) => b,
        Some(Loose::Num(n)) => n != 0.0 && !n.is_nan(),
        Some(Loose::Text(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        Some(Loose::Other(_)) | None => false,
    })
}

pub(crate) fn text<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(de)? {
        Some(Loose::Text(s)) => s,
        Some(Loose::Num(n)) => n.to_string(),
        Some(Loose::Bool(b)) => b.to_string(),
        Some(Loose::Other(_)) | None => String::new(),
    })
}

pub(crate) fn list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}
