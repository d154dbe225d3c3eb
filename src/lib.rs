//! Tessera - predicate compilation and evaluation for in-memory graph indexes
//!
//! This is the main library crate that re-exports all Tessera components.

pub use tessera_core as core;
pub use tessera_graph as graph;
pub use tessera_query as query;

// Re-export commonly used types
pub use tessera_core::{
    EntityUuid, Error, Label, Node, Property, PropertyValue, Relationship, Result, ValueKind,
};

pub use tessera_graph::{MemoryGraph, SearchOptions, SearchResult, SearchStats};
pub use tessera_query::{
    compile, CompileOptions, CompiledQuery, DroppedPredicatePolicy, GroupOperator, Occurrence,
    Operation, SearchPredicate, TranslatorRegistry,
};
