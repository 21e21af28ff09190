//! Code snippet shapes.

use chrono::{DateTime, Utc};
use ideaverse_core::domain::CodeSnippet;
use ideaverse_core::validation::validate_not_blank;
use ideaverse_core::vocab::LanguageEnum;
use ideaverse_core::{Metadata, Patch, ValidationError, Violations};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::common::{AuthorInfo, entity_search_params};
use crate::registry::{CreateSchema, Schema, UpdateSchema, decode_flattened, derived_schema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CodeSnippetBase {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub code: String,
    #[serde(default)]
    pub language: LanguageEnum,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub metadata: Metadata,
}

impl From<&CodeSnippet> for CodeSnippetBase {
    fn from(snippet: &CodeSnippet) -> Self {
        Self {
            title: snippet.title.clone(),
            description: snippet.description.clone(),
            code: snippet.code.clone(),
            language: snippet.language,
            tags: snippet.tags.clone(),
            is_public: snippet.is_public,
            metadata: snippet.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippetCreate {
    #[serde(flatten)]
    pub base: CodeSnippetBase,
    #[serde(default)]
    pub ai_generated: bool,
    pub ai_interaction_id: Option<String>,
    pub related_idea_id: Option<String>,
    pub related_project_id: Option<String>,
}

impl Schema for CodeSnippetCreate {
    const NAME: &'static str = "code.create";

    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        decode_flattened::<CodeSnippetBase, Self>(raw)
    }

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.merge(self.base.validate());
        violations.finish()
    }
}

impl CreateSchema for CodeSnippetCreate {}

impl CodeSnippetCreate {
    pub fn into_snippet(self, user_id: String) -> CodeSnippet {
        let base = self.base;
        let mut snippet = CodeSnippet::new(user_id, base.title, base.code, base.language);
        snippet.description = base.description;
        snippet.tags = base.tags;
        snippet.is_public = base.is_public;
        snippet.metadata = base.metadata;
        snippet.ai_generated = self.ai_generated;
        snippet.ai_interaction_id = self.ai_interaction_id;
        snippet.related_idea_id = self.related_idea_id;
        snippet.related_project_id = self.related_project_id;
        snippet
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeSnippetUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub title: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub code: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub language: Patch<LanguageEnum>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub tags: Patch<Vec<String>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub is_public: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub metadata: Patch<Metadata>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub related_idea_id: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub related_project_id: Patch<String>,
}

impl Schema for CodeSnippetUpdate {
    const NAME: &'static str = "code.update";

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        self.title.reject_null("title", &mut violations);
        self.code.reject_null("code", &mut violations);
        self.language.reject_null("language", &mut violations);
        self.tags.reject_null("tags", &mut violations);
        self.is_public.reject_null("is_public", &mut violations);
        self.metadata.reject_null("metadata", &mut violations);

        if let Some(title) = self.title.value() {
            violations.rule("title", validate_not_blank(title));
        }
        if let Some(code) = self.code.value() {
            violations.rule("code", validate_not_blank(code));
        }
        violations.finish()
    }
}

impl UpdateSchema for CodeSnippetUpdate {
    fn is_empty(&self) -> bool {
        self.title.is_unset()
            && self.description.is_unset()
            && self.code.is_unset()
            && self.language.is_unset()
            && self.tags.is_unset()
            && self.is_public.is_unset()
            && self.metadata.is_unset()
            && self.related_idea_id.is_unset()
            && self.related_project_id.is_unset()
    }
}

impl CodeSnippetUpdate {
    pub fn apply(self, snippet: &mut CodeSnippet) {
        self.title.apply_required(&mut snippet.title);
        self.description.apply_to(&mut snippet.description);
        self.code.apply_required(&mut snippet.code);
        self.language.apply_required(&mut snippet.language);
        self.tags.apply_required(&mut snippet.tags);
        self.is_public.apply_required(&mut snippet.is_public);
        self.metadata.apply_required(&mut snippet.metadata);
        self.related_idea_id.apply_to(&mut snippet.related_idea_id);
        self.related_project_id.apply_to(&mut snippet.related_project_id);
        snippet.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippetResponse {
    #[serde(flatten)]
    pub base: CodeSnippetBase,
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes: u64,
    pub views: u64,
    pub ai_generated: bool,
    pub ai_interaction_id: Option<String>,
    pub related_idea_id: Option<String>,
    pub related_project_id: Option<String>,
}

impl From<CodeSnippet> for CodeSnippetResponse {
    fn from(snippet: CodeSnippet) -> Self {
        Self {
            base: CodeSnippetBase::from(&snippet),
            id: snippet.id,
            user_id: snippet.user_id,
            created_at: snippet.created_at,
            updated_at: snippet.updated_at,
            likes: snippet.likes,
            views: snippet.views,
            ai_generated: snippet.ai_generated,
            ai_interaction_id: snippet.ai_interaction_id,
            related_idea_id: snippet.related_idea_id,
            related_project_id: snippet.related_project_id,
        }
    }
}

impl CodeSnippetResponse {
    pub fn with_author(self, author: AuthorInfo) -> CodeSnippetWithUser {
        CodeSnippetWithUser {
            snippet: self,
            user_username: author.username,
            user_profile_picture: author.profile_picture,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippetWithUser {
    #[serde(flatten)]
    pub snippet: CodeSnippetResponse,
    pub user_username: String,
    pub user_profile_picture: Option<String>,
}

entity_search_params! {
    /// Parameters for searching code snippets.
    CodeSnippetSearchParams {
        query: Option<String>,
        language: Option<LanguageEnum>,
        tags: Option<Vec<String>>,
        user_id: Option<String>,
        is_public: Option<bool>,
        ai_generated: Option<bool>,
        related_idea_id: Option<String>,
        related_project_id: Option<String>,
    }
}

derived_schema! {
    CodeSnippetSearchParams => "code.search",
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{validate_create, validate_search_params, validate_update};
    use serde_json::json;

    #[test]
    fn language_defaults_to_python() {
        let create: CodeSnippetCreate = validate_create(json!({
            "title": "Quicksort",
            "code": "def qs(xs): ...",
        }))
        .unwrap();
        assert_eq!(create.base.language, LanguageEnum::Python);
        assert_eq!(create.base.description, None);
        assert!(!create.ai_generated);
    }

    #[test]
    fn unknown_language_and_blank_code_are_rejected() {
        assert!(
            validate_create::<CodeSnippetCreate>(json!({
                "title": "T",
                "code": "x",
                "language": "cobol",
            }))
            .is_err()
        );

        let err = validate_create::<CodeSnippetCreate>(json!({"title": "T", "code": ""}))
            .unwrap_err();
        assert_eq!(err.reason_for("code"), Some("must not be blank"));
    }

    #[test]
    fn update_clears_links_but_not_code() {
        let mut snippet = CodeSnippetCreate {
            base: CodeSnippetBase {
                title: "T".into(),
                description: Some("old".into()),
                code: "fn main() {}".into(),
                language: LanguageEnum::Rust,
                tags: vec![],
                is_public: false,
                metadata: Metadata::new(),
            },
            ai_generated: false,
            ai_interaction_id: None,
            related_idea_id: Some("i1".into()),
            related_project_id: None,
        }
        .into_snippet("u1".into());

        let update: CodeSnippetUpdate =
            validate_update(json!({"related_idea_id": null, "description": null})).unwrap();
        assert!(!update.is_empty());
        update.apply(&mut snippet);
        assert_eq!(snippet.related_idea_id, None);
        assert_eq!(snippet.description, None);
        assert_eq!(snippet.language, LanguageEnum::Rust);

        let err = validate_update::<CodeSnippetUpdate>(json!({"code": null})).unwrap_err();
        assert_eq!(err.fields()[0].field, "code");
    }

    #[test]
    fn response_round_trip() {
        let snippet = CodeSnippet::new("u1".into(), "T".into(), "x = 1".into(), LanguageEnum::Python);
        let response = CodeSnippetResponse::from(snippet).with_author(AuthorInfo {
            username: "ada".into(),
            profile_picture: None,
        });
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["language"], json!("python"));
        assert_eq!(wire["related_project_id"], json!(null));
        let back: CodeSnippetWithUser = serde_json::from_value(wire).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn search_by_language() {
        let params: CodeSnippetSearchParams =
            validate_search_params(json!({"language": "typescript", "sort_order": "asc"}))
                .unwrap();
        assert_eq!(params.language, Some(LanguageEnum::Typescript));
        assert_eq!(params.sort_order, ideaverse_core::vocab::SortOrder::Asc);
    }
}
