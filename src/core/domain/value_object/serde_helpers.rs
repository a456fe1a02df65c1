//! Serde helpers for backend payload quirks.

use serde::{Deserialize, Deserializer};

/// Deserializes a field that the backend may send as `null`, falling back to
/// the type's default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes an optional timestamp, treating zero or negative values as
/// absent. The backend reports unset times as `0`.
pub fn positive_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.filter(|value| *value > 0.0))
}
