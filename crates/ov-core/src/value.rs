use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Decoded metadata value. Modern manifests only produce strings; the legacy
/// dialect can nest lists and dictionaries to any depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    String(String),
    List(Vec<MetaValue>),
    Map(BTreeMap<String, MetaValue>),
}

impl MetaValue {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MetaValue]> {
        match self {
            Self::List(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, MetaValue>> {
        match self {
            Self::Map(values) => Some(values),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "dictionary",
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Returns the value of the first key in `keys` present in `map`.
pub fn first_present<'a>(
    map: &'a BTreeMap<String, MetaValue>,
    keys: &[&str],
) -> Option<&'a MetaValue> {
    keys.iter().find_map(|key| map.get(*key))
}

/// Like [`first_present`] but only accepts non-blank strings.
pub fn first_non_blank<'a>(
    map: &'a BTreeMap<String, MetaValue>,
    keys: &[&str],
) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        map.get(*key)
            .and_then(MetaValue::as_string)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variants() {
        let value = MetaValue::List(vec!["a".into(), MetaValue::Map(BTreeMap::new())]);
        assert_eq!(value.type_name(), "list");
        let items = value.as_list().expect("list");
        assert_eq!(items[0].as_string(), Some("a"));
        assert!(items[1].as_map().is_some());
        assert!(value.as_string().is_none());
    }

    #[test]
    fn serializes_untagged() {
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), MetaValue::from("v"));
        let json = serde_json::to_string(&MetaValue::Map(map)).expect("json");
        assert_eq!(json, r#"{"k":"v"}"#);
    }

    #[test]
    fn first_non_blank_skips_blank_and_non_string_values() {
        let mut map = BTreeMap::new();
        map.insert("_id".to_string(), MetaValue::from("  "));
        map.insert("id".to_string(), MetaValue::List(Vec::new()));
        map.insert("nodeId".to_string(), MetaValue::from(" n7 "));
        assert_eq!(first_non_blank(&map, &["_id", "id", "nodeId"]), Some("n7"));
        assert_eq!(first_non_blank(&map, &["missing"]), None);
        assert!(first_present(&map, &["missing", "id"]).is_some());
    }
}
