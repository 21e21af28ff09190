//! Closed vocabularies shared across schemas.
//!
//! Every enum decodes from and encodes to its snake_case name, so an
//! out-of-set value fails at decode time and an in-set value round-trips
//! verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! vocab_display {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

/// Publication status of papers and projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEnum {
    #[default]
    Draft,
    InReview,
    Published,
    Archived,
}

impl StatusEnum {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusEnum::Draft => "draft",
            StatusEnum::InReview => "in_review",
            StatusEnum::Published => "published",
            StatusEnum::Archived => "archived",
        }
    }
}

/// Programming language of a code snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageEnum {
    #[default]
    Python,
    Javascript,
    Typescript,
    Java,
    C,
    Cpp,
    Csharp,
    Go,
    Rust,
    Ruby,
    Php,
    Swift,
    Kotlin,
    R,
    Julia,
    Matlab,
    Sql,
    Shell,
    Html,
    Css,
    Other,
}

impl LanguageEnum {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageEnum::Python => "python",
            LanguageEnum::Javascript => "javascript",
            LanguageEnum::Typescript => "typescript",
            LanguageEnum::Java => "java",
            LanguageEnum::C => "c",
            LanguageEnum::Cpp => "cpp",
            LanguageEnum::Csharp => "csharp",
            LanguageEnum::Go => "go",
            LanguageEnum::Rust => "rust",
            LanguageEnum::Ruby => "ruby",
            LanguageEnum::Php => "php",
            LanguageEnum::Swift => "swift",
            LanguageEnum::Kotlin => "kotlin",
            LanguageEnum::R => "r",
            LanguageEnum::Julia => "julia",
            LanguageEnum::Matlab => "matlab",
            LanguageEnum::Sql => "sql",
            LanguageEnum::Shell => "shell",
            LanguageEnum::Html => "html",
            LanguageEnum::Css => "css",
            LanguageEnum::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Lifecycle of an idea generation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaTaskStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl IdeaTaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaTaskStatus::Pending => "pending",
            IdeaTaskStatus::Processing => "processing",
            IdeaTaskStatus::Completed => "completed",
            IdeaTaskStatus::Failed => "failed",
        }
    }
}

/// Kind of a credit ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Purchase,
    Usage,
    Refund,
    Bonus,
    Adjustment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Usage => "usage",
            TransactionType::Refund => "refund",
            TransactionType::Bonus => "bonus",
            TransactionType::Adjustment => "adjustment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentOperation {
    Add,
    Remove,
}

impl ContentOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentOperation::Add => "add",
            ContentOperation::Remove => "remove",
        }
    }
}

/// Content a project can link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Idea,
    Paper,
    CodeSnippet,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Idea => "idea",
            ContentType::Paper => "paper",
            ContentType::CodeSnippet => "code_snippet",
        }
    }
}

vocab_display!(
    StatusEnum,
    LanguageEnum,
    SortOrder,
    IdeaTaskStatus,
    TransactionType,
    ContentOperation,
    ContentType,
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_round_trips_verbatim() {
        let status: StatusEnum = serde_json::from_value(json!("in_review")).unwrap();
        assert_eq!(status, StatusEnum::InReview);
        assert_eq!(serde_json::to_value(status).unwrap(), json!("in_review"));
        assert_eq!(status.to_string(), "in_review");
    }

    #[test]
    fn out_of_set_status_is_rejected() {
        assert!(serde_json::from_value::<StatusEnum>(json!("deleted")).is_err());
        assert!(serde_json::from_value::<StatusEnum>(json!("Draft")).is_err());
    }

    #[test]
    fn as_str_matches_wire_name() {
        for lang in [LanguageEnum::Cpp, LanguageEnum::Csharp, LanguageEnum::R] {
            assert_eq!(serde_json::to_value(lang).unwrap(), json!(lang.as_str()));
        }
        assert_eq!(
            serde_json::to_value(ContentType::CodeSnippet).unwrap(),
            json!("code_snippet")
        );
    }

    #[test]
    fn defaults() {
        assert_eq!(StatusEnum::default(), StatusEnum::Draft);
        assert_eq!(LanguageEnum::default(), LanguageEnum::Python);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }
}
