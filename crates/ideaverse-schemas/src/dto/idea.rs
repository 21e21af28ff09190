//! Idea generation shapes.
//!
//! [`IdeaSchema`] is the canonical description of a generated idea; it and
//! its nested types live in `ideaverse_core::domain` because persisted tasks
//! embed them. The shapes of the older, narrower idea module survive in
//! [`legacy`] for payloads still produced by old workers.

use chrono::{DateTime, Utc};
use ideaverse_core::domain::{IdeaTask, new_id};
use ideaverse_core::validation::validate_not_blank;
use ideaverse_core::vocab::IdeaTaskStatus;
use ideaverse_core::{Metadata, Patch, ValidationError, Violations};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

pub use ideaverse_core::domain::{FollowUpQuestion, IdeaFeedback, IdeaSchema, SimilarPaper};

use super::common::entity_search_params;
use crate::registry::{CreateSchema, Schema, UpdateSchema, derived_schema};

/// Prompt-facing name of [`IdeaSchema`]; the generator is asked to fill
/// exactly this shape.
pub type IdeaPromptSchema = IdeaSchema;

/// Free-form idea seed passed through to the generator.
pub type IdeaSeed = Map<String, Value>;

fn default_unknown_user() -> Option<String> {
    Some("unknown".to_string())
}

fn default_empty_text() -> Option<String> {
    Some(String::new())
}

fn default_seeds() -> Option<Vec<IdeaSeed>> {
    Some(Vec::new())
}

fn default_num_reflections() -> u32 {
    2
}

fn default_reflection_rounds() -> u32 {
    1
}

fn default_similar_papers() -> Option<Vec<SimilarPaper>> {
    Some(Vec::new())
}

fn clamp_all(shape: &'static str, ideas: &mut [IdeaSchema]) {
    for (index, idea) in ideas.iter_mut().enumerate() {
        if idea.clamp_scores() {
            tracing::warn!(
                shape,
                index,
                idea = %idea.name,
                "Idea scores outside [0, 1] were clamped"
            );
        }
    }
}

impl Schema for IdeaSchema {
    const NAME: &'static str = "idea.schema";

    fn normalize(&mut self) {
        clamp_all(Self::NAME, std::slice::from_mut(self));
    }

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.rule("Name", validate_not_blank(&self.name));
        violations.rule("Title", validate_not_blank(&self.title));
        violations.finish()
    }
}

/// Request to generate ideas for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IdeaGenerationTask {
    /// Fresh per request unless the caller supplies one.
    #[serde(default = "new_id")]
    pub task_id: String,
    #[serde(default = "default_unknown_user")]
    pub user_id: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub task_description: String,
    #[serde(default = "default_empty_text")]
    pub code: Option<String>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub num_ideas: u32,
    #[serde(default = "default_num_reflections")]
    pub num_reflections: u32,
    #[serde(default = "default_seeds")]
    pub prev_ideas: Option<Vec<IdeaSeed>>,
    #[serde(default = "default_seeds")]
    pub seed_ideas: Option<Vec<IdeaSeed>>,
    #[serde(default = "default_empty_text")]
    pub system_prompt: Option<String>,
}

impl CreateSchema for IdeaGenerationTask {}

impl IdeaGenerationTask {
    /// The pending task record this request starts.
    pub fn to_task(&self) -> IdeaTask {
        let user_id = self
            .user_id
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        IdeaTask::new(self.task_id.clone(), user_id, self.task_description.clone())
    }
}

/// User-editable fields of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdeaTaskUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub tags: Patch<Vec<String>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub metadata: Patch<Metadata>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub is_public: Patch<bool>,
}

impl Schema for IdeaTaskUpdate {
    const NAME: &'static str = "idea.update";

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        self.tags.reject_null("tags", &mut violations);
        self.metadata.reject_null("metadata", &mut violations);
        self.is_public.reject_null("is_public", &mut violations);
        violations.finish()
    }
}

impl UpdateSchema for IdeaTaskUpdate {
    fn is_empty(&self) -> bool {
        self.tags.is_unset() && self.metadata.is_unset() && self.is_public.is_unset()
    }
}

impl IdeaTaskUpdate {
    pub fn apply(self, task: &mut IdeaTask) {
        self.tags.apply_required(&mut task.tags);
        self.metadata.apply_required(&mut task.metadata);
        self.is_public.apply_required(&mut task.is_public);
        task.updated_at = Utc::now();
    }
}

/// Result of one generation task, as reported by the worker and returned to
/// the requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaResponse {
    pub task_id: String,
    pub user_id: String,
    pub status: IdeaTaskStatus,
    #[serde(default)]
    pub task_description: String,
    #[serde(default)]
    pub thought: String,
    #[serde(default)]
    pub ideas: Vec<IdeaSchema>,
    #[serde(default = "default_reflection_rounds")]
    pub reflection_rounds: u32,
    pub error: Option<String>,
    pub tags: Option<Vec<String>>,
    pub metadata: Option<Metadata>,
    #[serde(default = "default_similar_papers")]
    pub similar_papers: Option<Vec<SimilarPaper>>,
}

impl Schema for IdeaResponse {
    const NAME: &'static str = "idea.response";

    fn normalize(&mut self) {
        clamp_all(Self::NAME, &mut self.ideas);
    }

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        for (index, idea) in self.ideas.iter().enumerate() {
            violations.merge_at(&format!("ideas[{index}]"), idea.check());
        }
        violations.finish()
    }
}

impl From<IdeaTask> for IdeaResponse {
    fn from(task: IdeaTask) -> Self {
        Self {
            task_id: task.task_id,
            user_id: task.user_id,
            status: task.status,
            task_description: task.task_description,
            thought: task.thought.unwrap_or_default(),
            ideas: task.ideas,
            reflection_rounds: task.reflection_rounds,
            error: task.error,
            tags: Some(task.tags),
            metadata: Some(task.metadata),
            similar_papers: Some(task.similar_papers),
        }
    }
}

impl IdeaResponse {
    /// Record a worker result on the stored task.
    pub fn apply(self, task: &mut IdeaTask) {
        task.status = self.status;
        task.thought = Some(self.thought).filter(|t| !t.is_empty());
        task.ideas = self.ideas;
        task.reflection_rounds = self.reflection_rounds;
        task.error = self.error;
        if let Some(papers) = self.similar_papers {
            task.similar_papers = papers;
        }
        task.updated_at = Utc::now();
    }
}

/// Listing view of a stored task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaTasksResponse {
    pub id: String,
    pub task_id: String,
    pub user_id: String,
    pub status: IdeaTaskStatus,
    pub task_description: String,
    pub thought: Option<String>,
    pub ideas: Option<Vec<IdeaSchema>>,
    pub reflection_rounds: Option<u32>,
    pub error: Option<String>,
    pub tags: Option<Vec<String>>,
    pub metadata: Option<Metadata>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_public: Option<bool>,
    #[serde(default = "default_similar_papers")]
    pub similar_papers: Option<Vec<SimilarPaper>>,
}

impl From<IdeaTask> for IdeaTasksResponse {
    fn from(task: IdeaTask) -> Self {
        Self {
            id: task.id,
            task_id: task.task_id,
            user_id: task.user_id,
            status: task.status,
            task_description: task.task_description,
            thought: task.thought,
            ideas: Some(task.ideas),
            reflection_rounds: Some(task.reflection_rounds),
            error: task.error,
            tags: Some(task.tags),
            metadata: Some(task.metadata),
            created_at: Some(task.created_at),
            updated_at: Some(task.updated_at),
            is_public: Some(task.is_public),
            similar_papers: Some(task.similar_papers),
        }
    }
}

entity_search_params! {
    /// Parameters for searching idea tasks.
    IdeaSearchParams {
        query: Option<String>,
        tags: Option<Vec<String>>,
        user_id: Option<String>,
        status: Option<IdeaTaskStatus>,
        is_public: Option<bool>,
    }
}

derived_schema! {
    IdeaGenerationTask => "idea.generation_task",
    IdeaSearchParams => "idea.search",
}

/// Shapes from the first idea module, before descriptions, plans and
/// scores were added. Kept only to read old payloads.
pub mod legacy {
    use ideaverse_core::ValidationError;
    use ideaverse_core::vocab::IdeaTaskStatus;
    use serde::{Deserialize, Serialize};
    use serde_json::{Map, Value};

    use super::{IdeaResponse, IdeaSchema};

    #[deprecated(note = "use IdeaSchema")]
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct IdeaPromptSchemaV1 {
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
    }

    #[deprecated(note = "use IdeaResponse")]
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct IdeaResponseV1 {
        pub task_id: String,
        pub user_id: String,
        pub status: String,
        #[serde(default)]
        pub task_description: String,
        #[serde(default)]
        pub thought: String,
        #[serde(default)]
        pub ideas: Vec<Map<String, Value>>,
        #[serde(default = "super::default_reflection_rounds")]
        pub reflection_rounds: u32,
        pub error: Option<String>,
    }

    /// Upgrade keeps the V1 fields; the description starts as the
    /// experiment text and both scores start at zero.
    #[allow(deprecated)]
    impl From<IdeaPromptSchemaV1> for IdeaSchema {
        fn from(old: IdeaPromptSchemaV1) -> Self {
            IdeaSchema {
                description: old.experiment.clone(),
                name: old.name,
                title: old.title,
                experiment: old.experiment,
                interestingness: old.interestingness,
                feasibility: old.feasibility,
                novelty: old.novelty,
                implementation_steps: Vec::new(),
                expected_outcomes: Vec::new(),
                potential_challenges: Vec::new(),
                mitigation_strategies: Vec::new(),
                scientific_merit: 0.0,
                innovation_level: 0.0,
                thought: None,
                follow_up_questions: Vec::new(),
                feedback: Vec::new(),
            }
        }
    }

    /// V1 results carried the status as free text and ideas as raw maps;
    /// both must parse into the current shapes.
    #[allow(deprecated)]
    impl TryFrom<IdeaResponseV1> for IdeaResponse {
        type Error = ValidationError;

        fn try_from(old: IdeaResponseV1) -> Result<Self, Self::Error> {
            let status: IdeaTaskStatus = serde_json::from_value(Value::String(old.status))
                .map_err(|err| ValidationError::single("status", err.to_string()))?;
            let ideas = old
                .ideas
                .into_iter()
                .enumerate()
                .map(|(index, raw)| {
                    serde_json::from_value::<IdeaPromptSchemaV1>(Value::Object(raw))
                        .map(IdeaSchema::from)
                        .map_err(|err| {
                            ValidationError::single(format!("ideas[{index}]"), err.to_string())
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(IdeaResponse {
                task_id: old.task_id,
                user_id: old.user_id,
                status,
                task_description: old.task_description,
                thought: old.thought,
                ideas,
                reflection_rounds: old.reflection_rounds,
                error: old.error,
                tags: None,
                metadata: None,
                similar_papers: Some(Vec::new()),
            })
        }
    }
}
