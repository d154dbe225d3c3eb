//! Search configuration options

use serde::{Deserialize, Serialize};
use tessera_core::{Error, Result};

/// Options for running a compiled query over a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Evaluate candidates on the rayon thread pool
    pub parallel: bool,

    /// Candidate count below which the scan stays sequential
    pub parallel_threshold: usize,

    /// Let the planner narrow the scan to a label bucket
    pub use_type_hints: bool,

    /// Maximum number of results, taken in identifier order
    pub limit: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 1024,
            use_type_hints: true,
            limit: None,
        }
    }
}

impl SearchOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-threaded scans
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Default::default()
        }
    }

    /// Create options for tests: parallel even for tiny graphs
    pub fn for_testing() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 0,
            use_type_hints: true,
            limit: None,
        }
    }

    /// Load options from a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("invalid search options: {}", e)))
    }

    /// Builder: set the result limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builder: enable or disable type hint planning
    pub fn use_type_hints(mut self, enabled: bool) -> Self {
        self.use_type_hints = enabled;
        self
    }

    /// Builder: set the parallel threshold
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if a scan over `candidates` entities should run in parallel
    pub fn runs_parallel(&self, candidates: usize) -> bool {
        self.parallel && candidates >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = SearchOptions::default();
        assert!(opts.parallel);
        assert_eq!(opts.parallel_threshold, 1024);
        assert!(opts.use_type_hints);
        assert_eq!(opts.limit, None);
        assert!(!opts.runs_parallel(10));
        assert!(opts.runs_parallel(5000));
    }

    #[test]
    fn test_presets() {
        assert!(!SearchOptions::sequential().runs_parallel(1_000_000));
        assert!(SearchOptions::for_testing().runs_parallel(1));
    }

    #[test]
    fn test_builder_pattern() {
        let opts = SearchOptions::new()
            .limit(5)
            .use_type_hints(false)
            .parallel_threshold(8);
        assert_eq!(opts.limit, Some(5));
        assert!(!opts.use_type_hints);
        assert_eq!(opts.parallel_threshold, 8);
    }

    #[test]
    fn test_from_json() {
        let opts = SearchOptions::from_json(r#"{"parallel": false, "limit": 10}"#).unwrap();
        assert!(!opts.parallel);
        assert_eq!(opts.limit, Some(10));
        assert_eq!(opts.parallel_threshold, 1024);

        let err = SearchOptions::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
