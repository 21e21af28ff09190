use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Comment;
use crate::metadata::Metadata;
use crate::vocab::StatusEnum;

/// Bibliographic reference cited by a paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub url: Option<String>,
    pub doi: Option<String>,
    /// Preformatted citation string, if the author supplied one.
    pub citation: Option<String>,
}

/// Paper entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub abstract_text: String,
    pub content: String,
    pub tags: Vec<String>,
    pub status: StatusEnum,
    pub is_public: bool,
    pub references: Vec<Reference>,
    pub metadata: Metadata,
    pub ai_generated: bool,
    pub ai_interaction_id: Option<String>,
    pub comments: Vec<Comment>,
    pub likes: u64,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Paper {
    /// Create a draft paper.
    pub fn new(user_id: String, title: String, abstract_text: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            user_id,
            title,
            abstract_text,
            content,
            tags: Vec::new(),
            status: StatusEnum::Draft,
            is_public: false,
            references: Vec::new(),
            metadata: Metadata::new(),
            ai_generated: false,
            ai_interaction_id: None,
            comments: Vec::new(),
            likes: 0,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
