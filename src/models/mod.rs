//! Catalog data models for the notebook cookbook.
//!
//! Field names serialize as camelCase to match the catalog file and the frontend.

mod catalog;
mod notebook;
mod tag;
mod topic;

pub use catalog::*;
pub use notebook::*;
pub use tag::*;
pub use topic::*;
