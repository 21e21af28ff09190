use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Comment;
use crate::metadata::Metadata;
use crate::vocab::{ContentOperation, ContentType, StatusEnum};

/// Membership of a user in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMember {
    pub user_id: String,
    pub role: String,
    #[serde(default = "Utc::now")]
    pub joined_at: DateTime<Utc>,
}

impl ProjectMember {
    pub fn new(user_id: String, role: String) -> Self {
        Self {
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }
}

/// Project entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub status: StatusEnum,
    pub is_public: bool,
    pub deadline: Option<DateTime<Utc>>,
    pub metadata: Metadata,
    pub members: Vec<ProjectMember>,
    pub related_ideas: Vec<String>,
    pub related_papers: Vec<String>,
    pub related_code_snippets: Vec<String>,
    pub comments: Vec<Comment>,
    pub likes: u64,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a draft project.
    pub fn new(user_id: String, title: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            user_id,
            title,
            description,
            tags: Vec::new(),
            status: StatusEnum::Draft,
            is_public: false,
            deadline: None,
            metadata: Metadata::new(),
            members: Vec::new(),
            related_ideas: Vec::new(),
            related_papers: Vec::new(),
            related_code_snippets: Vec::new(),
            comments: Vec::new(),
            likes: 0,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn related(&self, content_type: ContentType) -> &[String] {
        match content_type {
            ContentType::Idea => &self.related_ideas,
            ContentType::Paper => &self.related_papers,
            ContentType::CodeSnippet => &self.related_code_snippets,
        }
    }

    fn related_mut(&mut self, content_type: ContentType) -> &mut Vec<String> {
        match content_type {
            ContentType::Idea => &mut self.related_ideas,
            ContentType::Paper => &mut self.related_papers,
            ContentType::CodeSnippet => &mut self.related_code_snippets,
        }
    }

    /// Link or unlink related content. Returns whether the list changed.
    ///
    /// Adding an id already present is a no-op.
    pub fn update_related(
        &mut self,
        operation: ContentOperation,
        content_type: ContentType,
        content_id: &str,
    ) -> bool {
        let list = self.related_mut(content_type);
        let changed = match operation {
            ContentOperation::Add => {
                if list.iter().any(|id| id == content_id) {
                    false
                } else {
                    list.push(content_id.to_string());
                    true
                }
            }
            ContentOperation::Remove => {
                let before = list.len();
                list.retain(|id| id != content_id);
                list.len() != before
            }
        };
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_content_add_and_remove() {
        let mut project = Project::new("u1".into(), "Title".into(), "Desc".into());

        assert!(project.update_related(ContentOperation::Add, ContentType::Paper, "p1"));
        assert!(!project.update_related(ContentOperation::Add, ContentType::Paper, "p1"));
        assert_eq!(project.related(ContentType::Paper), ["p1".to_string()]);
        assert!(project.related(ContentType::Idea).is_empty());

        assert!(project.update_related(ContentOperation::Remove, ContentType::Paper, "p1"));
        assert!(!project.update_related(ContentOperation::Remove, ContentType::Paper, "p1"));
        assert!(project.related(ContentType::Paper).is_empty());
    }

    #[test]
    fn member_joined_at_defaults_to_now() {
        let before = Utc::now();
        let member: ProjectMember =
            serde_json::from_value(serde_json::json!({"user_id": "u2", "role": "editor"}))
                .unwrap();
        assert!(member.joined_at >= before);
    }
}
