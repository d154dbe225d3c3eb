//! Tessera Graph Index
//!
//! An in-memory property graph searched with compiled predicate queries.
//!
//! # Overview
//!
//! The graph index provides:
//! - Node and relationship storage with label and type buckets
//! - Named outgoing adjacency for relationship-existence predicates
//! - Planned, optionally parallel searches over nodes and relationships

pub mod candidate;
pub mod graph;
pub mod options;
pub mod search;

pub use candidate::{NodeCandidate, RelationshipCandidate};
pub use graph::MemoryGraph;
pub use options::SearchOptions;
pub use search::{SearchResult, SearchStats};
