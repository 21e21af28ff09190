//! Paper shapes.

use chrono::{DateTime, Utc};
use ideaverse_core::domain::Paper;
use ideaverse_core::validation::validate_not_blank;
use ideaverse_core::vocab::StatusEnum;
use ideaverse_core::{Metadata, Patch, ValidationError, Violations};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

pub use ideaverse_core::domain::Reference;

use super::comment::CommentResponse;
use super::common::{AuthorInfo, entity_search_params};
use crate::registry::{CreateSchema, Schema, UpdateSchema, decode_flattened, derived_schema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PaperBase {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: StatusEnum,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl From<&Paper> for PaperBase {
    fn from(paper: &Paper) -> Self {
        Self {
            title: paper.title.clone(),
            abstract_text: paper.abstract_text.clone(),
            content: paper.content.clone(),
            tags: paper.tags.clone(),
            status: paper.status,
            is_public: paper.is_public,
            references: paper.references.clone(),
            metadata: paper.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperCreate {
    #[serde(flatten)]
    pub base: PaperBase,
    #[serde(default)]
    pub ai_generated: bool,
    pub ai_interaction_id: Option<String>,
}

impl Schema for PaperCreate {
    const NAME: &'static str = "paper.create";

    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        decode_flattened::<PaperBase, Self>(raw)
    }

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.merge(self.base.validate());
        for (index, reference) in self.base.references.iter().enumerate() {
            violations.rule(
                &format!("references[{index}].title"),
                validate_not_blank(&reference.title),
            );
        }
        violations.finish()
    }
}

impl CreateSchema for PaperCreate {}

impl PaperCreate {
    pub fn into_paper(self, user_id: String) -> Paper {
        let base = self.base;
        let mut paper = Paper::new(user_id, base.title, base.abstract_text, base.content);
        paper.tags = base.tags;
        paper.status = base.status;
        paper.is_public = base.is_public;
        paper.references = base.references;
        paper.metadata = base.metadata;
        paper.ai_generated = self.ai_generated;
        paper.ai_interaction_id = self.ai_interaction_id;
        paper
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub title: Patch<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Patch::is_unset")]
    pub abstract_text: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub content: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub tags: Patch<Vec<String>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub status: Patch<StatusEnum>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub is_public: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub references: Patch<Vec<Reference>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub metadata: Patch<Metadata>,
}

impl Schema for PaperUpdate {
    const NAME: &'static str = "paper.update";

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        // Every stored paper field is required.
        self.title.reject_null("title", &mut violations);
        self.abstract_text.reject_null("abstract", &mut violations);
        self.content.reject_null("content", &mut violations);
        self.tags.reject_null("tags", &mut violations);
        self.status.reject_null("status", &mut violations);
        self.is_public.reject_null("is_public", &mut violations);
        self.references.reject_null("references", &mut violations);
        self.metadata.reject_null("metadata", &mut violations);

        if let Some(title) = self.title.value() {
            violations.rule("title", validate_not_blank(title));
        }
        violations.finish()
    }
}

impl UpdateSchema for PaperUpdate {
    fn is_empty(&self) -> bool {
        self.title.is_unset()
            && self.abstract_text.is_unset()
            && self.content.is_unset()
            && self.tags.is_unset()
            && self.status.is_unset()
            && self.is_public.is_unset()
            && self.references.is_unset()
            && self.metadata.is_unset()
    }
}

impl PaperUpdate {
    pub fn apply(self, paper: &mut Paper) {
        self.title.apply_required(&mut paper.title);
        self.abstract_text.apply_required(&mut paper.abstract_text);
        self.content.apply_required(&mut paper.content);
        self.tags.apply_required(&mut paper.tags);
        self.status.apply_required(&mut paper.status);
        self.is_public.apply_required(&mut paper.is_public);
        self.references.apply_required(&mut paper.references);
        self.metadata.apply_required(&mut paper.metadata);
        paper.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperResponse {
    #[serde(flatten)]
    pub base: PaperBase,
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes: u64,
    pub views: u64,
    pub ai_generated: bool,
    pub ai_interaction_id: Option<String>,
    #[serde(default)]
    pub comments: Vec<CommentResponse>,
}

impl From<Paper> for PaperResponse {
    fn from(paper: Paper) -> Self {
        Self {
            base: PaperBase::from(&paper),
            id: paper.id,
            user_id: paper.user_id,
            created_at: paper.created_at,
            updated_at: paper.updated_at,
            likes: paper.likes,
            views: paper.views,
            ai_generated: paper.ai_generated,
            ai_interaction_id: paper.ai_interaction_id,
            comments: paper.comments.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

impl PaperResponse {
    pub fn with_author(self, author: AuthorInfo) -> PaperWithUser {
        PaperWithUser {
            paper: self,
            user_username: author.username,
            user_profile_picture: author.profile_picture,
        }
    }
}

/// Paper response with the author's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperWithUser {
    #[serde(flatten)]
    pub paper: PaperResponse,
    pub user_username: String,
    pub user_profile_picture: Option<String>,
}

entity_search_params! {
    /// Parameters for searching papers.
    PaperSearchParams {
        query: Option<String>,
        tags: Option<Vec<String>>,
        user_id: Option<String>,
        status: Option<StatusEnum>,
        is_public: Option<bool>,
        ai_generated: Option<bool>,
    }
}

derived_schema! {
    PaperSearchParams => "paper.search",
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{validate_create, validate_search_params, validate_update};
    use ideaverse_core::domain::Comment;
    use serde_json::json;

    #[test]
    fn create_fills_defaults() {
        let paper: PaperCreate = validate_create(json!({
            "title": "Attention Is Enough",
            "abstract": "We show...",
            "content": "Full text",
        }))
        .unwrap();

        assert_eq!(paper.base.title, "Attention Is Enough");
        assert_eq!(paper.base.status, StatusEnum::Draft);
        assert!(!paper.base.is_public);
        assert!(paper.base.tags.is_empty());
        assert!(paper.base.metadata.is_empty());
        assert!(!paper.ai_generated);
        assert_eq!(paper.ai_interaction_id, None);
    }

    #[test]
    fn create_rejects_unknown_status() {
        let err = validate_create::<PaperCreate>(json!({
            "title": "T",
            "abstract": "A",
            "content": "C",
            "status": "retracted",
        }))
        .unwrap_err();
        assert_eq!(err.fields()[0].field, "status");
        assert!(err.fields()[0].reason.contains("retracted"));
    }

    #[test]
    fn mistyped_base_field_is_located() {
        let err = validate_create::<PaperCreate>(json!({
            "title": 5,
            "abstract": "A",
            "content": "C",
        }))
        .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.fields()[0].field, "title");
        assert!(err.fields()[0].reason.contains("invalid type"));
    }

    #[test]
    fn create_preserves_status_verbatim() {
        let paper: PaperCreate = validate_create(json!({
            "title": "T",
            "abstract": "A",
            "content": "C",
            "status": "published",
        }))
        .unwrap();
        assert_eq!(paper.base.status, StatusEnum::Published);
        assert_eq!(serde_json::to_value(&paper).unwrap()["status"], json!("published"));
    }

    #[test]
    fn create_checks_reference_titles() {
        let err = validate_create::<PaperCreate>(json!({
            "title": "T",
            "abstract": "A",
            "content": "C",
            "references": [{"title": "Ok"}, {"title": ""}],
        }))
        .unwrap_err();
        assert_eq!(err.fields()[0].field, "references[1].title");
    }

    #[test]
    fn update_serializes_only_supplied_fields() {
        let update: PaperUpdate =
            validate_update(json!({"abstract": "New abstract", "status": "archived"})).unwrap();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"abstract": "New abstract", "status": "archived"})
        );
    }

    #[test]
    fn update_apply_and_null_rejection() {
        let mut paper = Paper::new("u1".into(), "T".into(), "A".into(), "C".into());
        let update: PaperUpdate = validate_update(json!({"tags": ["nlp"]})).unwrap();
        update.apply(&mut paper);
        assert_eq!(paper.tags, vec!["nlp".to_string()]);
        assert_eq!(paper.title, "T");

        let err = validate_update::<PaperUpdate>(json!({"status": null})).unwrap_err();
        assert_eq!(err.fields()[0].field, "status");
    }

    #[test]
    fn response_round_trips_with_author() {
        let mut paper = PaperCreate {
            base: PaperBase {
                title: "T".into(),
                abstract_text: "A".into(),
                content: "C".into(),
                tags: vec!["ml".into()],
                status: StatusEnum::InReview,
                is_public: true,
                references: vec![],
                metadata: Metadata::new(),
            },
            ai_generated: true,
            ai_interaction_id: Some("ai-1".into()),
        }
        .into_paper("u1".into());
        paper.comments.push(Comment::new("u2".into(), "Great".into()));

        let response = PaperResponse::from(paper);
        let with_user = response.clone().with_author(AuthorInfo {
            username: "ada".into(),
            profile_picture: None,
        });

        let wire = serde_json::to_value(&with_user).unwrap();
        assert_eq!(wire["abstract"], json!("A"));
        assert_eq!(wire["user_username"], json!("ada"));
        assert_eq!(wire["comments"][0]["content"], json!("Great"));

        let back: PaperWithUser = serde_json::from_value(wire).unwrap();
        assert_eq!(back.paper, response);
    }

    #[test]
    fn search_defaults_and_bounds() {
        let params: PaperSearchParams =
            validate_search_params(json!({"ai_generated": true})).unwrap();
        assert_eq!(params.limit, 10);
        assert_eq!(params.skip, 0);
        assert_eq!(params.sort_by, "created_at");

        assert!(validate_search_params::<PaperSearchParams>(json!({"limit": 500})).is_err());
    }
}
