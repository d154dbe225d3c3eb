//! Query builder
//!
//! Mutable accumulator used while translators run. It owns a stack of open
//! groups whose bottom entry is the root AND group; `finish` turns it into an
//! immutable [`CompiledQuery`].
//!
//! Misuse (closing the root, finishing with groups still open, leaving an OR
//! group without members) is a bug in a translator and panics.

use crate::evaluator::{self, Candidate};
use crate::expr::{Expr, Group, GroupKind, Leaf};
use std::collections::BTreeSet;
use std::fmt;
use tessera_core::Label;
use tracing::{debug, trace};

/// A group under construction and the number of its members that were dropped
#[derive(Debug)]
struct OpenGroup {
    group: Group,
    dropped: usize,
}

impl OpenGroup {
    fn new(kind: GroupKind) -> Self {
        Self {
            group: Group::new(kind),
            dropped: 0,
        }
    }
}

/// Accumulates one query tree. Not shared across queries or threads.
#[derive(Debug)]
pub struct QueryBuilder {
    stack: Vec<OpenGroup>,
    type_hints: BTreeSet<Label>,
}

impl QueryBuilder {
    /// Create a builder whose root is an empty AND group
    pub fn new() -> Self {
        Self {
            stack: vec![OpenGroup::new(GroupKind::And)],
            type_hints: BTreeSet::new(),
        }
    }

    /// Open a child group under the current one and make it current
    pub fn begin_group(&mut self, kind: GroupKind) {
        trace!(?kind, depth = self.stack.len(), "begin group");
        self.stack.push(OpenGroup::new(kind));
    }

    /// Close the current group and attach it to its parent.
    ///
    /// A group left empty because every member was dropped is discarded and
    /// counts as a dropped member of its parent. An AND group that was empty
    /// from the start is kept: it is vacuously true, or false when negated.
    ///
    /// # Panics
    ///
    /// Panics when only the root group is open, or when an OR group is closed
    /// with no members and nothing dropped.
    pub fn end_group(&mut self) {
        if self.stack.len() <= 1 {
            panic!("QueryBuilder::end_group called without a matching begin_group");
        }
        let OpenGroup { group, dropped } = self.pop();
        trace!(kind = ?group.kind, children = group.children.len(), dropped, "end group");

        if group.is_empty() {
            if dropped > 0 {
                debug!(kind = ?group.kind, negated = group.negated, dropped, "discarding empty group");
                self.mark_dropped();
                return;
            }
            if group.kind == GroupKind::Or {
                panic!("QueryBuilder::end_group closed an OR group with no members");
            }
        }
        self.current().group.children.push(Expr::Group(group));
    }

    /// Close the current group without attaching it, after a failed translation
    pub(crate) fn abandon_group(&mut self) {
        if self.stack.len() > 1 {
            let open = self.pop();
            trace!(kind = ?open.group.kind, "abandon group");
        }
    }

    /// Set the negation flag on the current group
    pub fn negate_current_group(&mut self) {
        trace!(depth = self.stack.len(), "negate group");
        self.current().group.negated = true;
    }

    /// Append a leaf to the current group
    pub fn add_leaf(&mut self, leaf: Leaf) {
        trace!(%leaf, "add leaf");
        self.current().group.children.push(Expr::Leaf(leaf));
    }

    /// Note that a member of the current group was dropped untranslated
    pub fn mark_dropped(&mut self) {
        self.current().dropped += 1;
    }

    /// Record a node type label the storage layer may use to narrow its scan
    pub fn record_type_hint(&mut self, label: Label) {
        self.type_hints.insert(label);
    }

    /// Number of open groups, the root included
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn type_hints(&self) -> &BTreeSet<Label> {
        &self.type_hints
    }

    /// Finish the tree.
    ///
    /// A negated root that lost all of its members to dropped predicates is
    /// un-negated; a negated root that never had members matches nothing.
    ///
    /// # Panics
    ///
    /// Panics if any group besides the root is still open.
    pub fn finish(mut self) -> CompiledQuery {
        if self.stack.len() != 1 {
            panic!(
                "QueryBuilder::finish called with {} unclosed group(s)",
                self.stack.len() - 1
            );
        }
        let OpenGroup { mut group, dropped } = self.pop();
        if group.is_empty() && group.negated && dropped > 0 {
            debug!(dropped, "clearing negation on root emptied by dropped predicates");
            group.negated = false;
        }
        let passthrough_count = group.count_leaves(&|leaf| matches!(leaf, Leaf::Passthrough { .. }));

        CompiledQuery {
            root: group,
            type_hints: self.type_hints,
            passthrough_count,
        }
    }

    fn current(&mut self) -> &mut OpenGroup {
        match self.stack.last_mut() {
            Some(open) => open,
            None => panic!("QueryBuilder has no open group"),
        }
    }

    fn pop(&mut self) -> OpenGroup {
        match self.stack.pop() {
            Some(open) => open,
            None => panic!("QueryBuilder has no open group"),
        }
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A finished, immutable query tree
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    root: Group,
    type_hints: BTreeSet<Label>,
    passthrough_count: usize,
}

impl CompiledQuery {
    /// The top-level group
    pub fn root(&self) -> &Group {
        &self.root
    }

    /// Node type labels seen during translation. Optimization only.
    pub fn type_hints(&self) -> &BTreeSet<Label> {
        &self.type_hints
    }

    /// Number of leaves standing in for operations that are not evaluated
    pub fn passthrough_count(&self) -> usize {
        self.passthrough_count
    }

    /// Returns true if the query places no constraint at all
    pub fn is_unconstrained(&self) -> bool {
        self.root.is_empty() && !self.root.negated
    }

    /// Evaluate the query against one candidate
    pub fn matches<C: Candidate + ?Sized>(&self, candidate: &C) -> bool {
        evaluator::evaluate(&self.root, candidate)
    }

    /// Node labels every match must carry.
    ///
    /// Collected from node label matches reachable from the root through
    /// non-negated AND groups only.
    pub fn mandatory_labels(&self) -> BTreeSet<Label> {
        let mut labels = BTreeSet::new();
        collect_mandatory(&self.root, &mut labels);
        labels
    }
}

fn collect_mandatory(group: &Group, labels: &mut BTreeSet<Label>) {
    if group.negated || group.kind != GroupKind::And {
        return;
    }
    for child in &group.children {
        match child {
            Expr::Leaf(Leaf::LabelMatch {
                label,
                source: None,
                target: None,
            }) => {
                labels.insert(label.clone());
            }
            Expr::Group(inner) => collect_mandatory(inner, labels),
            Expr::Leaf(_) => {}
        }
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::StaticCandidate;
    use crate::predicate::Operation;

    #[test]
    fn test_empty_builder_finishes_to_true() {
        let query = QueryBuilder::new().finish();
        assert!(query.is_unconstrained());
        assert_eq!(query.to_string(), "TRUE");
    }

    #[test]
    fn test_nested_groups() {
        let mut builder = QueryBuilder::new();
        builder.add_leaf(Leaf::label("Person"));
        builder.begin_group(GroupKind::Or);
        builder.add_leaf(Leaf::equals("status", "active"));
        builder.add_leaf(Leaf::is_null("status"));
        builder.negate_current_group();
        assert_eq!(builder.depth(), 2);
        builder.end_group();
        assert_eq!(builder.depth(), 1);

        let query = builder.finish();
        assert_eq!(
            query.to_string(),
            "(:Person AND NOT (status = \"active\" OR status IS NULL))"
        );
    }

    #[test]
    fn test_groups_emptied_by_drops_are_discarded() {
        let mut builder = QueryBuilder::new();
        builder.begin_group(GroupKind::Or);
        builder.mark_dropped();
        builder.end_group();
        builder.begin_group(GroupKind::And);
        builder.negate_current_group();
        builder.mark_dropped();
        builder.end_group();
        let query = builder.finish();
        assert!(query.is_unconstrained());
        assert!(query.matches(&StaticCandidate::node(["Person"])));
    }

    #[test]
    fn test_discarded_group_counts_as_dropped_in_parent() {
        let mut builder = QueryBuilder::new();
        builder.negate_current_group();
        builder.begin_group(GroupKind::Or);
        builder.mark_dropped();
        builder.end_group();
        let query = builder.finish();
        assert!(!query.root().negated);
        assert!(query.is_unconstrained());
    }

    #[test]
    fn test_negated_empty_and_group_matches_nothing() {
        let mut builder = QueryBuilder::new();
        builder.begin_group(GroupKind::And);
        builder.negate_current_group();
        builder.end_group();
        let query = builder.finish();
        assert_eq!(query.to_string(), "(NOT TRUE)");
        assert!(!query.is_unconstrained());
        assert!(!query.matches(&StaticCandidate::node(["Person"])));
    }

    #[test]
    fn test_empty_and_group_is_kept_as_true() {
        let mut builder = QueryBuilder::new();
        builder.begin_group(GroupKind::And);
        builder.end_group();
        let query = builder.finish();
        assert_eq!(query.to_string(), "(TRUE)");
        assert!(query.matches(&StaticCandidate::node(["Person"])));
    }

    #[test]
    fn test_negated_empty_root_matches_nothing() {
        let mut builder = QueryBuilder::new();
        builder.negate_current_group();
        let query = builder.finish();
        assert!(query.root().negated);
        assert!(!query.matches(&StaticCandidate::node(["Person"])));
    }

    #[test]
    fn test_negated_root_emptied_by_drops_is_cleared() {
        let mut builder = QueryBuilder::new();
        builder.negate_current_group();
        builder.mark_dropped();
        let query = builder.finish();
        assert!(!query.root().negated);
        assert!(query.matches(&StaticCandidate::node(["Person"])));
    }

    #[test]
    #[should_panic(expected = "OR group with no members")]
    fn test_empty_or_group_panics() {
        let mut builder = QueryBuilder::new();
        builder.begin_group(GroupKind::Or);
        builder.end_group();
    }

    #[test]
    fn test_abandon_group_detaches() {
        let mut builder = QueryBuilder::new();
        builder.begin_group(GroupKind::Or);
        builder.abandon_group();
        assert_eq!(builder.depth(), 1);
        assert!(builder.finish().is_unconstrained());
    }

    #[test]
    #[should_panic(expected = "without a matching begin_group")]
    fn test_end_group_underflow_panics() {
        let mut builder = QueryBuilder::new();
        builder.end_group();
    }

    #[test]
    #[should_panic(expected = "unclosed group")]
    fn test_finish_with_open_group_panics() {
        let mut builder = QueryBuilder::new();
        builder.begin_group(GroupKind::And);
        let _ = builder.finish();
    }

    #[test]
    fn test_type_hints_and_passthrough_count() {
        let mut builder = QueryBuilder::new();
        builder.add_leaf(Leaf::label("Person"));
        builder.record_type_hint(Label::new("Person"));
        builder.add_leaf(Leaf::Passthrough {
            name: "name".into(),
            operation: Operation::StartsWith,
        });
        let query = builder.finish();
        assert!(query.type_hints().contains(&Label::new("Person")));
        assert_eq!(query.passthrough_count(), 1);
    }

    #[test]
    fn test_mandatory_labels_skip_or_and_negation() {
        let mut builder = QueryBuilder::new();
        builder.add_leaf(Leaf::label("Person"));
        builder.begin_group(GroupKind::And);
        builder.add_leaf(Leaf::label("Employee"));
        builder.end_group();
        builder.begin_group(GroupKind::Or);
        builder.add_leaf(Leaf::label("Dog"));
        builder.add_leaf(Leaf::label("Cat"));
        builder.end_group();
        builder.begin_group(GroupKind::And);
        builder.negate_current_group();
        builder.add_leaf(Leaf::label("Robot"));
        builder.end_group();

        let labels = builder.finish().mandatory_labels();
        let names: Vec<&str> = labels.iter().map(Label::name).collect();
        assert_eq!(names, vec!["Employee", "Person"]);
    }

    #[test]
    fn test_negated_root_has_no_mandatory_labels() {
        let mut builder = QueryBuilder::new();
        builder.add_leaf(Leaf::label("Person"));
        builder.negate_current_group();
        assert!(builder.finish().mandatory_labels().is_empty());
    }
}
