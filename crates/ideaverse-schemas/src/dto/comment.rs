//! Comment shapes shared by papers and projects.

use chrono::{DateTime, Utc};
use ideaverse_core::domain::Comment;
use ideaverse_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::AuthorInfo;
use crate::registry::{CreateSchema, derived_schema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommentCreate {
    #[validate(custom(function = "validate_not_blank"))]
    pub content: String,
}

derived_schema! {
    CommentCreate => "comment.create",
}

impl CreateSchema for CommentCreate {}

impl CommentCreate {
    pub fn into_comment(self, user_id: String) -> Comment {
        Comment::new(user_id, self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_deleted: bool,
    pub user_username: Option<String>,
    pub user_profile_picture: Option<String>,
}

impl CommentResponse {
    pub fn with_author(mut self, author: &AuthorInfo) -> Self {
        self.user_username = Some(author.username.clone());
        self.user_profile_picture = author.profile_picture.clone();
        self
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            user_id: comment.user_id,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            is_deleted: comment.is_deleted,
            user_username: None,
            user_profile_picture: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::validate_create;
    use serde_json::json;

    #[test]
    fn blank_comment_is_rejected() {
        let err = validate_create::<CommentCreate>(json!({"content": "   "})).unwrap_err();
        assert_eq!(err.reason_for("content"), Some("must not be blank"));
    }

    #[test]
    fn response_joins_author() {
        let comment = CommentCreate { content: "Nice".into() }.into_comment("u1".into());
        let author = AuthorInfo {
            username: "ada".into(),
            profile_picture: Some("https://img/ada.png".into()),
        };
        let response = CommentResponse::from(comment).with_author(&author);
        assert_eq!(response.user_username.as_deref(), Some("ada"));
        assert!(!response.is_deleted);
    }
}
