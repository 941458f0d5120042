//! Domain models for requirements interchange documents.
//!
//! This module contains the document model, the fixed schema catalog, the
//! enumerated kinds, the rich-text converter and configuration.

/// The in-memory document: requirement objects and relation edges.
pub mod document;
pub use document::{
    Body, Document, DocumentError, NewRequirement, RelationEdge, RequirementObject,
};

mod config;
pub use config::{Config, Prefixes};

/// Requirement kinds, relation kinds, status and priority.
pub mod kind;
pub use kind::{Priority, RelationKind, RequirementKind, Status};

pub mod rich_text;
pub use rich_text::{RichText, convert};

/// The fixed datatype, attribute and type schema.
pub mod schema;
pub use schema::SchemaCatalog;
