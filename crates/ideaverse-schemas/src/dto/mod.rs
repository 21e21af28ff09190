//! Request and response shapes, one module per entity.
//!
//! Each entity follows the same layout: a `*Base` with the shared fields,
//! `*Create` / `*Update` request shapes, `*Response` / `*WithUser` read-out
//! views and `*SearchParams` for listings.

pub mod code;
pub mod comment;
pub mod common;
pub mod credit;
pub mod idea;
pub mod paper;
pub mod project;
pub mod user;
