//! Forgiving field decoders for listing and demand-profile JSON.
//!
//! Customer criteria are stored exactly as the intake form produced them, so a
//! single record can carry `null`s, strings where numbers belong, or features
//! set to `"yes"`. A malformed field must never reject the whole record: it
//! decodes as absent and the matcher scores that criterion as unmatched.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Decode `T`, or `None` if the field is null or has the wrong shape
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Decode a non-empty string; empty strings count as "not given"
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Decode a list, dropping entries that do not decode as `T`
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Decode a feature map, keeping only entries with a boolean value
pub fn flags<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(flag_map).unwrap_or_default())
}

/// Boolean entries of a JSON object; anything else yields an empty map
pub fn flag_map(value: Value) -> BTreeMap<String, bool> {
    match value {
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(key, v)| v.as_bool().map(|flag| (key, flag)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "optional")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "text")]
        name: Option<String>,
        #[serde(default, deserialize_with = "list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "flags")]
        features: BTreeMap<String, bool>,
    }

    #[test]
    fn test_wrong_types_decode_as_absent() {
        let probe: Probe = serde_json::from_str(
            r#"{"price": "cheap", "name": 42, "tags": "x", "features": [true]}"#,
        )
        .unwrap();

        assert_eq!(probe.price, None);
        assert_eq!(probe.name, None);
        assert!(probe.tags.is_empty());
        assert!(probe.features.is_empty());
    }

    #[test]
    fn test_partial_values_are_kept() {
        let probe: Probe = serde_json::from_str(
            r#"{"price": 1500, "name": "", "tags": ["a", 1, "b"], "features": {"balcony": true, "parking": "yes"}}"#,
        )
        .unwrap();

        assert_eq!(probe.price, Some(1500.0));
        assert_eq!(probe.name, None);
        assert_eq!(probe.tags, vec!["a", "b"]);
        assert_eq!(probe.features.len(), 1);
        assert_eq!(probe.features.get("balcony"), Some(&true));
    }

    #[test]
    fn test_missing_and_null_fields() {
        let probe: Probe = serde_json::from_str(r#"{"price": null}"#).unwrap();

        assert_eq!(probe.price, None);
        assert!(probe.tags.is_empty());
    }
}
