//! Schema trait and the name-keyed shape table.
//!
//! Every request shape implements [`Schema`]. Decoding, normalization and
//! rule checks all go through [`parse`], so a shape is either fully valid or
//! rejected with a [`ValidationError`] listing each offending field.

use ideaverse_core::ValidationError;
use ideaverse_core::error::DOCUMENT_PATH;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::dto::code::{CodeSnippetCreate, CodeSnippetSearchParams, CodeSnippetUpdate};
use crate::dto::comment::CommentCreate;
use crate::dto::common::{PageWindow, PaginationParams, SearchParams};
use crate::dto::credit::{CreditCreate, CreditPurchase, CreditSearchParams, CreditUsage};
use crate::dto::idea::{
    IdeaGenerationTask, IdeaResponse, IdeaSchema, IdeaSearchParams, IdeaTaskUpdate,
};
use crate::dto::paper::{PaperCreate, PaperSearchParams, PaperUpdate};
use crate::dto::project::{
    ProjectContentUpdate, ProjectCreate, ProjectMemberUpdate, ProjectSearchParams, ProjectUpdate,
};
use crate::dto::user::{
    EmailVerification, PasswordReset, PasswordResetRequest, SocialUserCreate, UserCreate,
    UserLogin, UserPasswordUpdate, UserPreferencesUpdate, UserSearchParams, UserUpdate,
};

/// A named, checkable request shape.
pub trait Schema: Serialize + DeserializeOwned {
    /// Registry name, `<entity>.<shape>`.
    const NAME: &'static str;

    /// Decode a raw document. Shapes built on a `#[serde(flatten)]` base
    /// override this with [`decode_flattened`].
    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        decode_tracked(raw)
    }

    /// Rewrite lenient fields in place before checking (score clamping).
    fn normalize(&mut self) {}

    /// Check field rules on a decoded record.
    fn check(&self) -> Result<(), ValidationError>;
}

/// Shapes accepted by creation endpoints.
pub trait CreateSchema: Schema {}

/// Partial-update shapes: absent fields mean "leave unchanged".
pub trait UpdateSchema: Schema {
    /// True when the payload would change nothing.
    fn is_empty(&self) -> bool;
}

/// Query / filter / pagination shapes.
pub trait SearchSchema: Schema {
    fn window(&self) -> PageWindow;
}

/// Implements [`Schema`] for shapes whose rules are all `#[validate]`
/// attributes.
macro_rules! derived_schema {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl crate::registry::Schema for $ty {
                const NAME: &'static str = $name;

                fn check(&self) -> Result<(), ideaverse_core::ValidationError> {
                    validator::Validate::validate(self).map_err(Into::into)
                }
            }
        )+
    };
}

pub(crate) use derived_schema;

/// Decode `raw` as `T`, reporting failures at their JSON path.
pub(crate) fn decode_tracked<T: DeserializeOwned>(raw: &Value) -> Result<T, ValidationError> {
    serde_path_to_error::deserialize(raw).map_err(|err| {
        let path = err.path().to_string();
        ValidationError::from_serde_at(&path, err.into_inner())
    })
}

/// Decode a shape whose shared fields come from a flattened base `B`.
///
/// serde decodes flattened fields from a buffer, so their failures surface at
/// the document root. When that happens the base is decoded on its own to
/// find the offending field.
pub(crate) fn decode_flattened<B, S>(raw: &Value) -> Result<S, ValidationError>
where
    B: DeserializeOwned,
    S: DeserializeOwned,
{
    let err = match decode_tracked::<S>(raw) {
        Ok(record) => return Ok(record),
        Err(err) => err,
    };
    if err.fields().iter().any(|e| e.field != DOCUMENT_PATH) {
        return Err(err);
    }
    match decode_tracked::<B>(raw) {
        Err(located) => Err(located),
        Ok(_) => Err(err),
    }
}

/// Decode, normalize and check a raw JSON document as `S`.
pub fn parse<S: Schema>(raw: Value) -> Result<S, ValidationError> {
    let mut record = S::decode(&raw).map_err(|err| {
        tracing::debug!(shape = S::NAME, error = %err, "Document failed to decode");
        err
    })?;

    record.normalize();

    if let Err(err) = record.check() {
        tracing::debug!(
            shape = S::NAME,
            violations = err.len(),
            error = %err,
            "Document rejected"
        );
        return Err(err);
    }

    tracing::debug!(shape = S::NAME, "Document accepted");
    Ok(record)
}

pub fn validate_create<S: CreateSchema>(raw: Value) -> Result<S, ValidationError> {
    parse(raw)
}

pub fn validate_update<S: UpdateSchema>(raw: Value) -> Result<S, ValidationError> {
    parse(raw)
}

pub fn validate_search_params<S: SearchSchema>(raw: Value) -> Result<S, ValidationError> {
    parse(raw)
}

/// What a registered shape is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Create,
    Update,
    Search,
    /// Any other inbound payload (login, password reset, worker results).
    Request,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Create => "create",
            ShapeKind::Update => "update",
            ShapeKind::Search => "search",
            ShapeKind::Request => "request",
        }
    }
}

/// One entry of the shape table.
pub struct ShapeEntry {
    pub name: &'static str,
    pub kind: ShapeKind,
    checker: fn(Value) -> Result<Value, ValidationError>,
}

impl ShapeEntry {
    /// Check `raw` and return the normalized record as JSON.
    pub fn check(&self, raw: Value) -> Result<Value, ValidationError> {
        (self.checker)(raw)
    }
}

impl std::fmt::Debug for ShapeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

fn check_as<S: Schema>(raw: Value) -> Result<Value, ValidationError> {
    let record = parse::<S>(raw)?;
    serde_json::to_value(&record).map_err(|err| ValidationError::single(DOCUMENT_PATH, err.to_string()))
}

macro_rules! shape_table {
    ($($kind:ident $ty:ty),+ $(,)?) => {
        &[
            $(
                ShapeEntry {
                    name: <$ty as Schema>::NAME,
                    kind: ShapeKind::$kind,
                    checker: check_as::<$ty>,
                },
            )+
        ]
    };
}

/// Every registered request shape.
pub static SHAPES: &[ShapeEntry] = shape_table![
    // common
    Search PaginationParams,
    Search SearchParams,
    // user
    Create UserCreate,
    Create SocialUserCreate,
    Update UserUpdate,
    Update UserPasswordUpdate,
    Update UserPreferencesUpdate,
    Request UserLogin,
    Request PasswordResetRequest,
    Request PasswordReset,
    Request EmailVerification,
    Search UserSearchParams,
    // idea
    Create IdeaGenerationTask,
    Update IdeaTaskUpdate,
    Request IdeaSchema,
    Request IdeaResponse,
    Search IdeaSearchParams,
    // paper
    Create PaperCreate,
    Update PaperUpdate,
    Search PaperSearchParams,
    Create CommentCreate,
    // project
    Create ProjectCreate,
    Update ProjectUpdate,
    Update ProjectMemberUpdate,
    Update ProjectContentUpdate,
    Search ProjectSearchParams,
    // code
    Create CodeSnippetCreate,
    Update CodeSnippetUpdate,
    Search CodeSnippetSearchParams,
    // credit
    Create CreditCreate,
    Request CreditPurchase,
    Request CreditUsage,
    Search CreditSearchParams,
];

pub fn lookup(name: &str) -> Option<&'static ShapeEntry> {
    SHAPES.iter().find(|entry| entry.name == name)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    SHAPES.iter().map(|entry| entry.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn shape_names_are_unique_and_namespaced() {
        let mut seen = HashSet::new();
        for name in names() {
            assert!(seen.insert(name), "duplicate shape name {name}");
            assert!(name.contains('.'), "{name} has no entity prefix");
        }
    }

    #[test]
    fn lookup_checks_and_normalizes() {
        let entry = lookup("paper.create").unwrap();
        assert_eq!(entry.kind, ShapeKind::Create);

        let out = entry
            .check(json!({"title": "T", "abstract": "A", "content": "C"}))
            .unwrap();
        assert_eq!(out["status"], json!("draft"));
        assert_eq!(out["ai_generated"], json!(false));
    }

    #[test]
    fn lookup_unknown_shape() {
        assert!(lookup("paper.delete").is_none());
    }

    #[test]
    fn decode_errors_carry_their_path() {
        let err = lookup("user.create")
            .unwrap()
            .check(json!({"email": 7, "username": "ada", "password": "Passw0rd"}))
            .unwrap_err();
        assert_eq!(err.fields()[0].field, "email");

        let err = lookup("paper.update").unwrap().check(json!({"tags": [1]})).unwrap_err();
        assert_eq!(err.fields()[0].field, "tags[0]");
    }

    #[test]
    fn non_object_documents_are_rejected() {
        let err = lookup("user.login").unwrap().check(json!([1, 2])).unwrap_err();
        assert_eq!(err.fields()[0].field, DOCUMENT_PATH);
    }
}
