//! Search execution
//!
//! Runs a compiled query over the graph: plan the scan, collect the
//! candidate set, evaluate every candidate, and return matches in identifier
//! order. Evaluation is a pure function of one candidate, so large scans are
//! spread over the rayon pool.

use crate::candidate::{NodeCandidate, RelationshipCandidate};
use crate::graph::MemoryGraph;
use crate::options::SearchOptions;
use rayon::prelude::*;
use std::time::Instant;
use tessera_core::{EntityUuid, Node, Relationship, Result};
use tessera_query::{
    compile, CompileOptions, CompiledQuery, PlannerStats, ScanPlan, ScanPlanner, SearchPredicate,
};
use tracing::debug;

/// Statistics for one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStats {
    pub candidates_scanned: u64,
    pub matches: u64,
    pub strategy: &'static str,
    pub parallel: bool,
    pub execution_time_ms: u64,
}

/// Search result
#[derive(Debug, Clone)]
pub struct SearchResult<T> {
    /// Matching entities in identifier order
    pub items: Vec<T>,

    pub plan: ScanPlan,

    pub stats: SearchStats,
}

impl<T> SearchResult<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl MemoryGraph {
    /// Find the nodes matching a compiled query
    pub fn search_nodes(&self, query: &CompiledQuery, options: &SearchOptions) -> Result<SearchResult<Node>> {
        let state = self.read()?;
        let plan = planner(state.node_stats(), options).plan(query);
        let ids: Vec<EntityUuid> = match &plan {
            ScanPlan::FullScan { .. } => state.nodes.keys().copied().collect(),
            ScanPlan::TypeBucket { label, .. } => state
                .label_index
                .get(label)
                .map(|ids| ids.iter().copied().collect())
                .unwrap_or_default(),
        };

        let result = scan(ids, plan, options, |id| {
            let node = state.nodes.get(id)?;
            query
                .matches(&NodeCandidate::new(&state, node))
                .then(|| node.clone())
        });
        debug!(graph = self.name(), "node search: {}", summary(&result.stats));
        Ok(result)
    }

    /// Find the relationships matching a compiled query
    pub fn search_relationships(
        &self,
        query: &CompiledQuery,
        options: &SearchOptions,
    ) -> Result<SearchResult<Relationship>> {
        let state = self.read()?;
        let plan = planner(state.relationship_stats(), options).plan(query);
        let ids: Vec<EntityUuid> = match &plan {
            ScanPlan::FullScan { .. } => state.relationships.keys().copied().collect(),
            ScanPlan::TypeBucket { label, .. } => state
                .rel_type_index
                .get(label)
                .map(|ids| ids.iter().copied().collect())
                .unwrap_or_default(),
        };

        let result = scan(ids, plan, options, |id| {
            let rel = state.relationships.get(id)?;
            let candidate = RelationshipCandidate::new(&state, rel)?;
            query.matches(&candidate).then(|| rel.clone())
        });
        debug!(graph = self.name(), "relationship search: {}", summary(&result.stats));
        Ok(result)
    }

    /// Compile predicates and search nodes in one step
    pub fn find_nodes(
        &self,
        predicates: &[SearchPredicate],
        compile_options: &CompileOptions,
        options: &SearchOptions,
    ) -> Result<SearchResult<Node>> {
        let query = compile(predicates, compile_options)?;
        self.search_nodes(&query, options)
    }

    /// Compile predicates and search relationships in one step
    pub fn find_relationships(
        &self,
        predicates: &[SearchPredicate],
        compile_options: &CompileOptions,
        options: &SearchOptions,
    ) -> Result<SearchResult<Relationship>> {
        let query = compile(predicates, compile_options)?;
        self.search_relationships(&query, options)
    }
}

fn planner(stats: PlannerStats, options: &SearchOptions) -> ScanPlanner {
    ScanPlanner::new(stats).use_type_hints(options.use_type_hints)
}

fn scan<T, F>(mut ids: Vec<EntityUuid>, plan: ScanPlan, options: &SearchOptions, probe: F) -> SearchResult<T>
where
    T: Send,
    F: Fn(&EntityUuid) -> Option<T> + Sync,
{
    let start = Instant::now();
    ids.sort_unstable();

    let parallel = options.runs_parallel(ids.len());
    let mut items: Vec<T> = if parallel {
        ids.par_iter().filter_map(&probe).collect()
    } else {
        ids.iter().filter_map(&probe).collect()
    };
    let matches = items.len() as u64;
    if let Some(limit) = options.limit {
        items.truncate(limit);
    }

    let stats = SearchStats {
        candidates_scanned: ids.len() as u64,
        matches,
        strategy: plan.strategy(),
        parallel,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };
    SearchResult { items, plan, stats }
}

fn summary(stats: &SearchStats) -> String {
    format!(
        "{} scanned, {} matched, strategy {}, parallel {}, {}ms",
        stats.candidates_scanned, stats.matches, stats.strategy, stats.parallel, stats.execution_time_ms
    )
}
