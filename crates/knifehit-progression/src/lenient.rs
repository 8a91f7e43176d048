//! Tolerant numeric decoding for persisted records.
//!
//! The preference store may hand back integers encoded as floats (and the
//! other way round). These helpers are plugged into `#[serde(deserialize_with)]`
//! so a record decodes from either encoding. `null` decodes as zero.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    UInt(u64),
    Int(i64),
    Float(f64),
}

impl Numeric {
    fn to_u64(&self) -> u64 {
        match *self {
            Self::UInt(v) => v,
            Self::Int(v) => v.max(0) as u64,
            Self::Float(v) if v.is_finite() && v > 0.0 => v as u64,
            Self::Float(_) => 0,
        }
    }

    fn to_f64(&self) -> f64 {
        match *self {
            Self::UInt(v) => v as f64,
            Self::Int(v) => v as f64,
            Self::Float(v) if v.is_finite() => v,
            Self::Float(_) => 0.0,
        }
    }
}

pub(crate) fn as_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Numeric>::deserialize(deserializer)?.map_or(0, |n| n.to_u64()))
}

pub(crate) fn as_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = as_u64(deserializer)?;
    Ok(value.min(u64::from(u32::MAX)) as u32)
}

pub(crate) fn as_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Numeric>::deserialize(deserializer)?.map_or(0.0, |n| n.to_f64()))
}

pub(crate) fn as_u32_set<'de, D>(deserializer: D) -> Result<BTreeSet<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Numeric>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .iter()
        .map(|n| n.to_u64().min(u64::from(u32::MAX)) as u32)
        .collect())
}

pub(crate) fn as_f64_list<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Numeric>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.iter().map(Numeric::to_f64).collect())
}
