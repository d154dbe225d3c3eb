//! Tessera Core Library
//!
//! This crate provides the fundamental types and error handling shared by
//! the Tessera predicate engine and its in-memory graph index.
//!
//! # Modules
//!
//! - `types` - Core data types (Node, Relationship, Label, Direction)
//! - `property` - Property values, declared value kinds and coercion
//! - `error` - Error types and result aliases
//! - `id` - Entity identifiers and canonical-format validation

pub mod error;
pub mod id;
pub mod property;
pub mod types;

pub use error::{Error, Result};
pub use id::EntityUuid;
pub use property::{Property, PropertyValue, ValueKind};
pub use types::{
    Direction, Label, Node, Relationship, ID_ATTRIBUTE, SOURCE_ID_ATTRIBUTE, TARGET_ID_ATTRIBUTE,
};
