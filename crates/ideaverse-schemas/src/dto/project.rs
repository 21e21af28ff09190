//! Project shapes: membership, related content and comments.

use chrono::{DateTime, Utc};
use ideaverse_core::domain::{Project, ProjectMember};
use ideaverse_core::validation::validate_not_blank;
use ideaverse_core::vocab::{ContentOperation, ContentType, StatusEnum};
use ideaverse_core::{Metadata, Patch, ValidationError, Violations};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::comment::{CommentCreate, CommentResponse};
use super::common::{AuthorInfo, entity_search_params};
use crate::registry::{CreateSchema, Schema, UpdateSchema, decode_flattened, derived_schema};

/// Comments on projects use the shared comment shape.
pub type ProjectCommentCreate = CommentCreate;

/// A member as supplied by the client; `joined_at` is assigned server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProjectMemberInput {
    #[validate(custom(function = "validate_not_blank"))]
    pub user_id: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub role: String,
}

impl From<ProjectMemberInput> for ProjectMember {
    fn from(input: ProjectMemberInput) -> Self {
        ProjectMember::new(input.user_id, input.role)
    }
}

fn check_members(members: &[ProjectMemberInput], violations: &mut Violations) {
    for (index, member) in members.iter().enumerate() {
        violations.merge_at(&format!("members[{index}]"), member.validate());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProjectBase {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: StatusEnum,
    #[serde(default)]
    pub is_public: bool,
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl From<&Project> for ProjectBase {
    fn from(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            tags: project.tags.clone(),
            status: project.status,
            is_public: project.is_public,
            deadline: project.deadline,
            metadata: project.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCreate {
    #[serde(flatten)]
    pub base: ProjectBase,
    #[serde(default)]
    pub members: Vec<ProjectMemberInput>,
    #[serde(default)]
    pub related_ideas: Vec<String>,
    #[serde(default)]
    pub related_papers: Vec<String>,
    #[serde(default)]
    pub related_code_snippets: Vec<String>,
}

impl Schema for ProjectCreate {
    const NAME: &'static str = "project.create";

    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        decode_flattened::<ProjectBase, Self>(raw)
    }

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.merge(self.base.validate());
        check_members(&self.members, &mut violations);
        violations.finish()
    }
}

impl CreateSchema for ProjectCreate {}

impl ProjectCreate {
    pub fn into_project(self, user_id: String) -> Project {
        let base = self.base;
        let mut project = Project::new(user_id, base.title, base.description);
        project.tags = base.tags;
        project.status = base.status;
        project.is_public = base.is_public;
        project.deadline = base.deadline;
        project.metadata = base.metadata;
        project.members = self.members.into_iter().map(ProjectMember::from).collect();
        project.related_ideas = self.related_ideas;
        project.related_papers = self.related_papers;
        project.related_code_snippets = self.related_code_snippets;
        project
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub title: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub tags: Patch<Vec<String>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub status: Patch<StatusEnum>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub is_public: Patch<bool>,
    /// `null` clears the deadline.
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub deadline: Patch<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub metadata: Patch<Metadata>,
}

impl Schema for ProjectUpdate {
    const NAME: &'static str = "project.update";

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        self.title.reject_null("title", &mut violations);
        self.description.reject_null("description", &mut violations);
        self.tags.reject_null("tags", &mut violations);
        self.status.reject_null("status", &mut violations);
        self.is_public.reject_null("is_public", &mut violations);
        self.metadata.reject_null("metadata", &mut violations);

        if let Some(title) = self.title.value() {
            violations.rule("title", validate_not_blank(title));
        }
        violations.finish()
    }
}

impl UpdateSchema for ProjectUpdate {
    fn is_empty(&self) -> bool {
        self.title.is_unset()
            && self.description.is_unset()
            && self.tags.is_unset()
            && self.status.is_unset()
            && self.is_public.is_unset()
            && self.deadline.is_unset()
            && self.metadata.is_unset()
    }
}

impl ProjectUpdate {
    pub fn apply(self, project: &mut Project) {
        self.title.apply_required(&mut project.title);
        self.description.apply_required(&mut project.description);
        self.tags.apply_required(&mut project.tags);
        self.status.apply_required(&mut project.status);
        self.is_public.apply_required(&mut project.is_public);
        self.deadline.apply_to(&mut project.deadline);
        self.metadata.apply_required(&mut project.metadata);
        project.updated_at = Utc::now();
    }
}

/// Replaces the member list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMemberUpdate {
    pub members: Vec<ProjectMemberInput>,
}

impl Schema for ProjectMemberUpdate {
    const NAME: &'static str = "project.member_update";

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        check_members(&self.members, &mut violations);
        violations.finish()
    }
}

impl UpdateSchema for ProjectMemberUpdate {
    fn is_empty(&self) -> bool {
        false
    }
}

impl ProjectMemberUpdate {
    /// Replace the members, keeping the join date of anyone already in.
    pub fn apply(self, project: &mut Project) {
        let previous = std::mem::take(&mut project.members);
        project.members = self
            .members
            .into_iter()
            .map(|input| {
                let joined_at = previous
                    .iter()
                    .find(|m| m.user_id == input.user_id)
                    .map(|m| m.joined_at);
                let mut member = ProjectMember::from(input);
                if let Some(joined_at) = joined_at {
                    member.joined_at = joined_at;
                }
                member
            })
            .collect();
        project.updated_at = Utc::now();
    }
}

/// Link or unlink one idea, paper or code snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProjectContentUpdate {
    pub operation: ContentOperation,
    pub content_type: ContentType,
    #[validate(custom(function = "validate_not_blank"))]
    pub content_id: String,
}

derived_schema! {
    ProjectContentUpdate => "project.content_update",
}

impl UpdateSchema for ProjectContentUpdate {
    fn is_empty(&self) -> bool {
        false
    }
}

impl ProjectContentUpdate {
    /// Returns whether the related list changed.
    pub fn apply(&self, project: &mut Project) -> bool {
        project.update_related(self.operation, self.content_type, &self.content_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMemberResponse {
    #[serde(flatten)]
    pub member: ProjectMember,
    pub user_username: Option<String>,
    pub user_profile_picture: Option<String>,
}

impl From<ProjectMember> for ProjectMemberResponse {
    fn from(member: ProjectMember) -> Self {
        Self {
            member,
            user_username: None,
            user_profile_picture: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub base: ProjectBase,
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub members: Vec<ProjectMemberResponse>,
    #[serde(default)]
    pub related_ideas: Vec<String>,
    #[serde(default)]
    pub related_papers: Vec<String>,
    #[serde(default)]
    pub related_code_snippets: Vec<String>,
    #[serde(default)]
    pub comments: Vec<CommentResponse>,
    pub likes: u64,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            base: ProjectBase::from(&project),
            id: project.id,
            user_id: project.user_id,
            members: project
                .members
                .into_iter()
                .map(ProjectMemberResponse::from)
                .collect(),
            related_ideas: project.related_ideas,
            related_papers: project.related_papers,
            related_code_snippets: project.related_code_snippets,
            comments: project.comments.into_iter().map(CommentResponse::from).collect(),
            likes: project.likes,
            views: project.views,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

impl ProjectResponse {
    /// Fill member and comment author fields from a profile lookup.
    pub fn with_profiles<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<AuthorInfo>,
    {
        for member in &mut self.members {
            if let Some(author) = lookup(&member.member.user_id) {
                member.user_username = Some(author.username);
                member.user_profile_picture = author.profile_picture;
            }
        }
        self.comments = self
            .comments
            .into_iter()
            .map(|comment| match lookup(&comment.user_id) {
                Some(author) => comment.with_author(&author),
                None => comment,
            })
            .collect();
        self
    }

    pub fn with_author(self, author: AuthorInfo) -> ProjectWithUser {
        ProjectWithUser {
            project: self,
            user_username: author.username,
            user_profile_picture: author.profile_picture,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectWithUser {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub user_username: String,
    pub user_profile_picture: Option<String>,
}

entity_search_params! {
    /// Parameters for searching projects.
    ProjectSearchParams {
        query: Option<String>,
        tags: Option<Vec<String>>,
        user_id: Option<String>,
        /// Projects where this user is a member.
        member_id: Option<String>,
        status: Option<StatusEnum>,
        is_public: Option<bool>,
    }
}

derived_schema! {
    ProjectSearchParams => "project.search",
}
