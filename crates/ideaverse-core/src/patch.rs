//! Presence tri-state for partial updates.
//!
//! Update payloads must tell "field omitted" apart from "field explicitly
//! null". A `Patch<T>` field is declared with `#[serde(default)]` so an absent
//! key decodes as [`Patch::Unset`], and with
//! `skip_serializing_if = "Patch::is_unset"` so it stays absent on the way out.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Violations;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Key absent: leave the stored value alone.
    Unset,
    /// Key present with `null`.
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> Patch<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Patch::Unset)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Patch::Null)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(v),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(f(v)),
        }
    }

    /// `None` when unset, `Some(None)` when null.
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Patch::Unset => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }

    /// Apply to a nullable stored field. Null clears it.
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Patch::Unset => {}
            Patch::Null => *slot = None,
            Patch::Value(v) => *slot = Some(v),
        }
    }

    /// Apply to a required stored field. Callers reject null beforehand with
    /// [`Patch::reject_null`]; a null reaching here is ignored.
    pub fn apply_required(self, slot: &mut T) {
        if let Patch::Value(v) = self {
            *slot = v;
        }
    }

    /// Record an error when a non-nullable field is explicitly nulled.
    pub fn reject_null(&self, field: &str, violations: &mut Violations) {
        if self.is_null() {
            violations.push(field, "may be omitted but not set to null");
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Value(v) => v.serialize(serializer),
            Patch::Unset | Patch::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct BioPatch {
        #[serde(skip_serializing_if = "Patch::is_unset")]
        bio: Patch<String>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let unset: BioPatch = serde_json::from_value(json!({})).unwrap();
        let null: BioPatch = serde_json::from_value(json!({"bio": null})).unwrap();
        let value: BioPatch = serde_json::from_value(json!({"bio": "hi"})).unwrap();

        assert_eq!(unset.bio, Patch::Unset);
        assert_eq!(null.bio, Patch::Null);
        assert_eq!(value.bio, Patch::Value("hi".to_string()));
    }

    #[test]
    fn serialization_preserves_presence() {
        let unset = serde_json::to_value(BioPatch { bio: Patch::Unset }).unwrap();
        let null = serde_json::to_value(BioPatch { bio: Patch::Null }).unwrap();
        assert_eq!(unset, json!({}));
        assert_eq!(null, json!({"bio": null}));
    }

    #[test]
    fn apply_respects_presence() {
        let mut slot = Some("old".to_string());
        Patch::Unset.apply_to(&mut slot);
        assert_eq!(slot.as_deref(), Some("old"));
        Patch::Value("new".to_string()).apply_to(&mut slot);
        assert_eq!(slot.as_deref(), Some("new"));
        Patch::<String>::Null.apply_to(&mut slot);
        assert_eq!(slot, None);
    }

    #[test]
    fn null_on_required_field_is_reported() {
        let mut violations = Violations::new();
        Patch::<String>::Null.reject_null("title", &mut violations);
        Patch::Value("x".to_string()).reject_null("other", &mut violations);
        let err = violations.finish().unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.fields()[0].field, "title");
    }
}
