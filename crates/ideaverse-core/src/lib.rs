//! # IdeaVerse Core
//!
//! The domain layer of the IdeaVerse schema registry.
//! This crate holds the persisted entity shapes, the closed vocabularies and
//! the field rules every request schema is checked against. It has no I/O.

pub mod domain;
pub mod error;
pub mod metadata;
pub mod patch;
pub mod validation;
pub mod vocab;

pub use error::{FieldError, ValidationError, Violations};
pub use metadata::{Metadata, MetadataValue};
pub use patch::Patch;
