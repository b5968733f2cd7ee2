//! Shared serde helper functions.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serde default function that returns `true`.
///
/// Used for boolean fields that should default to enabled.
pub fn default_true() -> bool {
    true
}

/// Parse YAML where enum variants are written as single-key maps
/// (`select: { ... }`) at any depth instead of `!select` tags.
pub fn from_yaml_str<T: DeserializeOwned>(content: &str) -> Result<T, serde_yaml::Error> {
    serde_yaml::with::singleton_map_recursive::deserialize(serde_yaml::Deserializer::from_str(
        content,
    ))
}

/// Render YAML in the same single-key-map shape [`from_yaml_str`] reads
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, serde_yaml::Error> {
    let mut serializer = serde_yaml::Serializer::new(Vec::new());
    serde_yaml::with::singleton_map_recursive::serialize(value, &mut serializer)?;
    let buf = serializer.into_inner()?;
    // serde_yaml only emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
#[path = "serde_helpers_test.rs"]
mod tests;
