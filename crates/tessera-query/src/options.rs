//! Query compilation options

use serde::{Deserialize, Serialize};
use tessera_core::{Error, Result};

/// What to do with a predicate that is too under-specified to translate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroppedPredicatePolicy {
    /// Leave the constraint out and log it
    #[default]
    Omit,
    /// Fail compilation with [`Error::DroppedPredicate`]
    Reject,
}

/// Options for compiling search predicates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Handling of under-specified predicates
    pub dropped_predicates: DroppedPredicatePolicy,

    /// Normalise operands to the attribute's declared kind
    pub coerce_operands: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            dropped_predicates: DroppedPredicatePolicy::Omit,
            coerce_operands: true,
        }
    }
}

impl CompileOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that reject under-specified predicates
    pub fn strict() -> Self {
        Self {
            dropped_predicates: DroppedPredicatePolicy::Reject,
            ..Default::default()
        }
    }

    /// Options that omit under-specified predicates
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Load options from a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("invalid compile options: {}", e)))
    }

    /// Builder: set the dropped predicate policy
    pub fn dropped_predicates(mut self, policy: DroppedPredicatePolicy) -> Self {
        self.dropped_predicates = policy;
        self
    }

    /// Builder: enable or disable operand coercion
    pub fn coerce_operands(mut self, enabled: bool) -> Self {
        self.coerce_operands = enabled;
        self
    }
}
