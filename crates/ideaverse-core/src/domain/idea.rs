use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;
use crate::validation::clamp_unit;
use crate::vocab::IdeaTaskStatus;

/// A published paper found close to a generated idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarPaper {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub year: Option<i32>,
    /// Where the paper was found ("arXiv", "Semantic Scholar", a journal).
    pub source: String,
    pub source_url: String,
    pub journal: Option<String>,
    pub doi: Option<String>,
    pub semantic_similarity: f64,
    pub citations: Option<u64>,
    pub venue: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub pdf_url: Option<String>,
    pub icon: Option<String>,
}

/// Question raised while reflecting on an idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpQuestion {
    pub question: String,
    pub rationale: Option<String>,
    pub category: Option<String>,
}

/// Reviewer scores for one reflection round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaFeedback {
    pub round: u32,
    /// Criterion name to score, e.g. `{"clarity": 0.8}`.
    #[serde(default)]
    pub scores: std::collections::BTreeMap<String, f64>,
    pub critique: Option<String>,
}

/// A generated research idea.
///
/// The first six fields keep the capitalized names the generator emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaSchema {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Experiment")]
    pub experiment: String,
    #[serde(rename = "Interestingness")]
    pub interestingness: f64,
    #[serde(rename = "Feasibility")]
    pub feasibility: f64,
    #[serde(rename = "Novelty")]
    pub novelty: f64,
    pub description: String,
    #[serde(default)]
    pub implementation_steps: Vec<String>,
    #[serde(default)]
    pub expected_outcomes: Vec<String>,
    #[serde(default)]
    pub potential_challenges: Vec<String>,
    #[serde(default)]
    pub mitigation_strategies: Vec<String>,
    /// Always within `[0.0, 1.0]` after [`IdeaSchema::clamp_scores`].
    pub scientific_merit: f64,
    pub innovation_level: f64,
    pub thought: Option<String>,
    #[serde(default)]
    pub follow_up_questions: Vec<FollowUpQuestion>,
    #[serde(default)]
    pub feedback: Vec<IdeaFeedback>,
}

impl IdeaSchema {
    /// Pull `scientific_merit` and `innovation_level` into range.
    ///
    /// Returns whether either value changed.
    pub fn clamp_scores(&mut self) -> bool {
        let merit = clamp_unit(self.scientific_merit);
        let innovation = clamp_unit(self.innovation_level);
        let changed = merit.to_bits() != self.scientific_merit.to_bits()
            || innovation.to_bits() != self.innovation_level.to_bits();
        self.scientific_merit = merit;
        self.innovation_level = innovation;
        changed
    }
}

/// Idea generation task entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaTask {
    pub id: String,
    pub task_id: String,
    pub user_id: String,
    pub status: IdeaTaskStatus,
    pub task_description: String,
    pub thought: Option<String>,
    pub ideas: Vec<IdeaSchema>,
    pub reflection_rounds: u32,
    pub error: Option<String>,
    pub tags: Vec<String>,
    pub metadata: Metadata,
    pub similar_papers: Vec<SimilarPaper>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IdeaTask {
    /// Create a pending task.
    pub fn new(task_id: String, user_id: String, task_description: String) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            task_id,
            user_id,
            status: IdeaTaskStatus::Pending,
            task_description,
            thought: None,
            ideas: Vec::new(),
            reflection_rounds: 0,
            error: None,
            tags: Vec::new(),
            metadata: Metadata::new(),
            similar_papers: Vec::new(),
            is_public: false,
            created_at: now,
            updated_at: now,
        }
    }
}
