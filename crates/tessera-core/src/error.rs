//! Error types for Tessera
//!
//! Compilation errors are kept apart from graph and configuration errors so
//! callers can tell a query that failed to compile from one that simply
//! matched nothing.

use thiserror::Error;

/// The main error type for Tessera operations
#[derive(Error, Debug)]
pub enum Error {
    // ========== Query Compilation Errors ==========
    #[error("Unsupported predicate: {0}")]
    UnsupportedPredicate(String),

    #[error("Predicate dropped: {0}")]
    DroppedPredicate(String),

    // ========== Graph Errors ==========
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Relationship not found: {0}")]
    RelationshipNotFound(String),

    #[error("Invalid graph operation: {0}")]
    InvalidGraphOperation(String),

    // ========== Configuration Errors ==========
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ========== Serialization Errors ==========
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ========== Internal Errors ==========
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Tessera operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if the error was raised while compiling a query.
    ///
    /// A compile error means no verdict was produced at all; it must never be
    /// confused with a query that compiled and returned zero matches.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedPredicate(_) | Error::DroppedPredicate(_)
        )
    }

    /// Returns true if the error refers to a missing graph entity
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NodeNotFound(_) | Error::RelationshipNotFound(_))
    }
}
