//! Free-form metadata maps with a closed set of value types.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// `metadata` / `preferences` map. Keys are free-form.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A metadata value: string, integer, boolean or list of strings.
///
/// Anything else (objects, nested lists, floats, null) fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Str(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Str(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(value: Vec<String>) -> Self {
        MetadataValue::List(value)
    }
}

struct MetadataValueVisitor;

impl<'de> Visitor<'de> for MetadataValueVisitor {
    type Value = MetadataValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, integer, boolean or list of strings")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(MetadataValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(MetadataValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(MetadataValue::Int)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(MetadataValue::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(MetadataValue::Str(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<String>()? {
            items.push(item);
        }
        Ok(MetadataValue::List(items))
    }
}

impl<'de> Deserialize<'de> for MetadataValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MetadataValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_closed_value_set() {
        let meta: Metadata = serde_json::from_value(json!({
            "source": "arxiv",
            "pages": 12,
            "peer_reviewed": true,
            "keywords": ["nlp", "rl"],
        }))
        .unwrap();

        assert_eq!(meta["source"], MetadataValue::from("arxiv"));
        assert_eq!(meta["pages"], MetadataValue::Int(12));
        assert_eq!(meta["peer_reviewed"], MetadataValue::Bool(true));
        assert_eq!(
            meta["keywords"],
            MetadataValue::List(vec!["nlp".into(), "rl".into()])
        );
        assert_eq!(serde_json::to_value(&meta).unwrap()["pages"], json!(12));
    }

    #[test]
    fn rejects_nesting_and_other_types() {
        for bad in [
            json!({"a": {"b": 1}}),
            json!({"a": [["x"]]}),
            json!({"a": [1, 2]}),
            json!({"a": 1.5}),
            json!({"a": null}),
        ] {
            assert!(
                serde_json::from_value::<Metadata>(bad.clone()).is_err(),
                "{bad} should be rejected"
            );
        }
    }
}
