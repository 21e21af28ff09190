//! Domain entities - the persisted form of every record the registry maps
//! into response shapes.
//!
//! Constructors assign fresh identifiers and timestamps; nothing here is
//! shared between two constructions.

mod code;
mod comment;
mod credit;
mod idea;
mod paper;
mod project;
mod user;

pub use code::CodeSnippet;
pub use comment::Comment;
pub use credit::CreditTransaction;
pub use idea::{FollowUpQuestion, IdeaFeedback, IdeaSchema, IdeaTask, SimilarPaper};
pub use paper::{Paper, Reference};
pub use project::{Project, ProjectMember};
pub use user::User;

/// Fresh string identifier for a new record.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
