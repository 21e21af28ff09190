//! # IdeaVerse Schemas
//!
//! Request and response shapes for users, ideas, papers, projects, code
//! snippets and credits, plus the common envelopes wrapping every API reply.
//!
//! Incoming JSON goes through [`registry::validate_create`],
//! [`registry::validate_update`] or [`registry::validate_search_params`];
//! persisted entities from `ideaverse-core` convert into the response shapes
//! with `From`.

pub mod dto;
pub mod registry;
pub mod response;

pub use ideaverse_core::{FieldError, ValidationError};
pub use registry::{
    CreateSchema, Schema, SearchSchema, UpdateSchema, parse, validate_create,
    validate_search_params, validate_update,
};
pub use response::{ErrorResponse, PaginatedResponse, ResponseStatus, StandardResponse};
