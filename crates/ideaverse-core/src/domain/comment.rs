use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment left on a paper or project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

impl Comment {
    pub fn new(user_id: String, content: String) -> Self {
        Self {
            user_id,
            content,
            created_at: Utc::now(),
            updated_at: None,
            is_deleted: false,
        }
    }
}
