use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;
use crate::vocab::LanguageEnum;

/// Code snippet entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub language: LanguageEnum,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub metadata: Metadata,
    pub ai_generated: bool,
    pub ai_interaction_id: Option<String>,
    pub related_idea_id: Option<String>,
    pub related_project_id: Option<String>,
    pub likes: u64,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CodeSnippet {
    pub fn new(user_id: String, title: String, code: String, language: LanguageEnum) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            user_id,
            title,
            description: None,
            code,
            language,
            tags: Vec::new(),
            is_public: false,
            metadata: Metadata::new(),
            ai_generated: false,
            ai_interaction_id: None,
            related_idea_id: None,
            related_project_id: None,
            likes: 0,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
