//! Typed form payloads accepted by the HTML routes.

use serde::{Deserialize, Deserializer};

pub mod enquiry;
pub mod lead;
pub mod main;

/// Browsers post empty optional inputs as `""`; map those to `None` so
/// validators only run against actual values.
pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Same as [`empty_string_as_none`] for numeric inputs.
pub(crate) fn empty_string_as_none_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse::<i32>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
