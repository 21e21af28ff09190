//! Validation error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Path used when a problem cannot be pinned to a single field.
pub const DOCUMENT_PATH: &str = "$";

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted field path, list indices in brackets (`members[2].role`).
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// The only error a schema check produces.
///
/// Always carries at least one [`FieldError`]; errors are kept sorted by field
/// path so the same input always yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summarize(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, reason)],
        }
    }

    fn from_fields(mut errors: Vec<FieldError>) -> Self {
        // Stable sort keeps rule order within one field.
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        Self { errors }
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_fields(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First reason recorded for `field`, if any.
    pub fn reason_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.reason.as_str())
    }

    /// Convert a wire decoding failure that carries no location, such as
    /// malformed JSON text.
    pub fn from_serde(err: serde_json::Error) -> Self {
        Self::from_serde_at("", err)
    }

    /// Convert a wire decoding failure raised at `path` (`members[0]`,
    /// `status`; empty or `.` for the document root).
    ///
    /// serde reports missing, unknown and duplicate fields against the
    /// enclosing record, so the named field is appended to the path.
    pub fn from_serde_at(path: &str, err: serde_json::Error) -> Self {
        let message = err.to_string();
        let named = ["missing field `", "unknown field `", "duplicate field `"]
            .iter()
            .find_map(|prefix| message.strip_prefix(prefix))
            .and_then(|rest| rest.split('`').next());
        let parent = Some(path).filter(|p| !p.is_empty() && *p != ".");
        let field = match (parent, named) {
            (Some(parent), Some(name)) => format!("{parent}.{name}"),
            (Some(parent), None) => parent.to_string(),
            (None, Some(name)) => name.to_string(),
            (None, None) => DOCUMENT_PATH.to_string(),
        };
        Self::single(field, message)
    }
}

impl From<ValidationErrors> for ValidationError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        flatten_errors(&errors, None, &mut fields);
        if fields.is_empty() {
            fields.push(FieldError::new(DOCUMENT_PATH, "invalid document"));
        }
        Self::from_fields(fields)
    }
}

fn flatten_errors(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(violations) => {
                for violation in violations {
                    let reason = violation
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| violation.code.to_string());
                    out.push(FieldError::new(path.clone(), reason));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_errors(inner, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

/// Collects field errors from several checks before deciding the outcome.
#[derive(Debug, Default)]
pub struct Violations {
    errors: Vec<FieldError>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.errors.push(FieldError::new(field, reason));
    }

    /// Absorb the outcome of a sub-check.
    pub fn merge<E: Into<ValidationError>>(&mut self, result: Result<(), E>) {
        if let Err(err) = result {
            self.errors.extend(err.into().into_fields());
        }
    }

    /// Record the outcome of a single `validator` rule against `field`.
    pub fn rule(&mut self, field: &str, result: Result<(), validator::ValidationError>) {
        if let Err(violation) = result {
            let reason = violation
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| violation.code.to_string());
            self.push(field, reason);
        }
    }

    /// Absorb a sub-check on a nested record, prefixing its field paths
    /// (`members[1]` + `role` becomes `members[1].role`).
    pub fn merge_at<E: Into<ValidationError>>(&mut self, prefix: &str, result: Result<(), E>) {
        if let Err(err) = result {
            self.errors.extend(err.into().into_fields().into_iter().map(|e| {
                let field = if e.field == DOCUMENT_PATH {
                    prefix.to_string()
                } else {
                    format!("{prefix}.{}", e.field)
                };
                FieldError::new(field, e.reason)
            }));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::from_fields(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct Titled {
        title: String,
    }

    #[test]
    fn missing_field_is_attributed() {
        let err = serde_json::from_value::<Titled>(serde_json::json!({})).unwrap_err();
        let err = ValidationError::from_serde(err);
        assert_eq!(err.fields()[0].field, "title");
    }

    #[test]
    fn syntax_errors_are_document_level() {
        let err = serde_json::from_str::<Titled>("{not json").unwrap_err();
        let err = ValidationError::from_serde(err);
        assert_eq!(err.fields()[0].field, DOCUMENT_PATH);
    }

    #[test]
    fn located_type_mismatch_keeps_its_path() {
        let err = serde_json::from_value::<Titled>(serde_json::json!({"title": 5})).unwrap_err();
        let err = ValidationError::from_serde_at("title", err);
        assert_eq!(err.fields()[0].field, "title");
        assert!(err.fields()[0].reason.contains("invalid type"));
    }

    #[test]
    fn missing_nested_field_joins_parent_path() {
        let err = serde_json::from_value::<Titled>(serde_json::json!({})).unwrap_err();
        let err = ValidationError::from_serde_at("members[0]", err);
        assert_eq!(err.fields()[0].field, "members[0].title");
    }

    #[test]
    fn root_path_is_the_document() {
        let err = serde_json::from_value::<Titled>(serde_json::json!([1])).unwrap_err();
        assert_eq!(ValidationError::from_serde_at(".", err).fields()[0].field, DOCUMENT_PATH);
    }

    #[test]
    fn violations_are_sorted_by_field() {
        let mut v = Violations::new();
        v.push("tags", "bad");
        v.push("email", "bad");
        v.push("tags", "worse");
        let err = v.finish().unwrap_err();
        let fields: Vec<_> = err.fields().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["email", "tags", "tags"]);
        assert_eq!(err.reason_for("tags"), Some("bad"));
    }

    #[test]
    fn empty_violations_pass() {
        assert_matches!(Violations::new().finish(), Ok(()));
    }

    #[test]
    fn nested_errors_get_prefixed() {
        let mut v = Violations::new();
        v.merge_at("members[1]", Err(ValidationError::single("role", "must not be blank")));
        v.merge_at("members[2]", Err(ValidationError::single(DOCUMENT_PATH, "not an object")));
        let err = v.finish().unwrap_err();
        assert_eq!(err.fields()[0].field, "members[1].role");
        assert_eq!(err.fields()[1].field, "members[2]");
    }

    #[test]
    fn display_lists_every_field() {
        let err = ValidationError::single("limit", "must be at most 100");
        assert_eq!(err.to_string(), "validation failed: limit: must be at most 100");
    }
}
