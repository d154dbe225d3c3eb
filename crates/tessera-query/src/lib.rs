//! Tessera Query Engine
//!
//! Compiles abstract search predicates into boolean expression trees and
//! evaluates them against graph entities.
//!
//! # Overview
//!
//! - Predicate model ([`SearchPredicate`]) consumed from the caller
//! - Per-kind translators routed by a [`TranslatorRegistry`]
//! - A [`QueryBuilder`] that assembles nested AND/OR/NOT groups
//! - A pure [`evaluate`] walk over a finished [`CompiledQuery`]
//! - A [`ScanPlanner`] that narrows scans to a label bucket when safe

pub mod builder;
pub mod evaluator;
pub mod expr;
pub mod options;
pub mod planner;
pub mod predicate;
pub mod translate;

pub use builder::{CompiledQuery, QueryBuilder};
pub use evaluator::{evaluate, evaluate_expr, evaluate_leaf, Candidate, CandidateShape, StaticCandidate};
pub use expr::{Expr, Group, GroupKind, Leaf, UuidTarget};
pub use options::{CompileOptions, DroppedPredicatePolicy};
pub use planner::{PlannerStats, ScanPlan, ScanPlanner};
pub use predicate::{Attribute, GroupOperator, Occurrence, Operation, PredicateKind, SearchPredicate};
pub use translate::{compile, TranslateContext, Translation, TranslatorRegistry};
