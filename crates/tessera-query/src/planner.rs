//! Scan planning
//!
//! Chooses between scanning every candidate and scanning one label bucket.
//! A bucket is only used for a label every match must carry, so the choice
//! never changes which candidates match.

use crate::builder::CompiledQuery;
use std::collections::HashMap;
use std::fmt;
use tessera_core::Label;
use tracing::debug;

/// How the candidate set for a search is produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPlan {
    /// Every entity is a candidate
    FullScan { estimated_rows: u64 },

    /// Only entities carrying `label` are candidates
    TypeBucket { label: Label, estimated_rows: u64 },
}

impl ScanPlan {
    pub fn estimated_rows(&self) -> u64 {
        match self {
            ScanPlan::FullScan { estimated_rows } => *estimated_rows,
            ScanPlan::TypeBucket { estimated_rows, .. } => *estimated_rows,
        }
    }

    /// Short strategy name for logs and statistics
    pub fn strategy(&self) -> &'static str {
        match self {
            ScanPlan::FullScan { .. } => "full_scan",
            ScanPlan::TypeBucket { .. } => "type_bucket",
        }
    }
}

impl fmt::Display for ScanPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPlan::FullScan { estimated_rows } => write!(f, "FullScan(~{})", estimated_rows),
            ScanPlan::TypeBucket {
                label,
                estimated_rows,
            } => write!(f, "TypeBucket(:{}, ~{})", label, estimated_rows),
        }
    }
}

/// Bucket sizes used to pick the cheapest scan
#[derive(Debug, Clone, Default)]
pub struct PlannerStats {
    /// Total number of entities
    pub total: u64,

    /// Number of entities per label
    pub per_label: HashMap<Label, u64>,
}

impl PlannerStats {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            per_label: HashMap::new(),
        }
    }

    /// Builder: record a bucket size
    pub fn with_label<L: Into<Label>>(mut self, label: L, count: u64) -> Self {
        self.per_label.insert(label.into(), count);
        self
    }

    /// Bucket size for a label; unknown labels have an empty bucket
    pub fn label_count(&self, label: &Label) -> u64 {
        self.per_label.get(label).copied().unwrap_or(0)
    }
}

/// Scan planner
#[derive(Debug, Clone)]
pub struct ScanPlanner {
    stats: PlannerStats,
    use_type_hints: bool,
}

impl ScanPlanner {
    /// Create a planner over the given statistics
    pub fn new(stats: PlannerStats) -> Self {
        Self {
            stats,
            use_type_hints: true,
        }
    }

    /// Builder: enable or disable bucket selection
    pub fn use_type_hints(mut self, enabled: bool) -> Self {
        self.use_type_hints = enabled;
        self
    }

    pub fn stats(&self) -> &PlannerStats {
        &self.stats
    }

    /// Plan the scan for a compiled query
    pub fn plan(&self, query: &CompiledQuery) -> ScanPlan {
        let plan = self.choose(query);
        debug!(
            strategy = plan.strategy(),
            estimated_rows = plan.estimated_rows(),
            total = self.stats.total,
            "planned scan {}",
            plan
        );
        plan
    }

    fn choose(&self, query: &CompiledQuery) -> ScanPlan {
        let full = ScanPlan::FullScan {
            estimated_rows: self.stats.total,
        };
        if !self.use_type_hints || query.type_hints().is_empty() {
            return full;
        }

        // Hinted labels that every match must carry
        let mandatory = query.mandatory_labels();
        query
            .type_hints()
            .iter()
            .filter(|label| mandatory.contains(*label))
            .map(|label| (label, self.stats.label_count(label)))
            .min_by(|(a, a_rows), (b, b_rows)| a_rows.cmp(b_rows).then_with(|| a.cmp(b)))
            .map(|(label, estimated_rows)| ScanPlan::TypeBucket {
                label: label.clone(),
                estimated_rows,
            })
            .unwrap_or(full)
    }
}

impl Default for ScanPlanner {
    fn default() -> Self {
        Self::new(PlannerStats::default())
    }
}
