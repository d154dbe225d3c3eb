//! Graph entities viewed as query candidates

use crate::graph::{Adjacency, GraphState};
use std::collections::HashSet;
use tessera_core::{EntityUuid, Label, Node, PropertyValue, Relationship};
use tessera_query::{Candidate, CandidateShape};

/// A stored node together with its outgoing adjacency
#[derive(Debug, Clone, Copy)]
pub struct NodeCandidate<'a> {
    node: &'a Node,
    adjacency: Option<&'a Adjacency>,
}

impl<'a> NodeCandidate<'a> {
    pub(crate) fn new(state: &'a GraphState, node: &'a Node) -> Self {
        Self {
            node,
            adjacency: state.outgoing.get(&node.id),
        }
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }
}

impl Candidate for NodeCandidate<'_> {
    fn attribute(&self, name: &str) -> Option<&PropertyValue> {
        self.node.get_property(name)
    }

    fn shape(&self) -> CandidateShape<'_> {
        CandidateShape::Node {
            labels: &self.node.labels,
        }
    }

    fn related(&self, name: &str) -> &[EntityUuid] {
        self.adjacency
            .and_then(|adjacency| adjacency.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// A stored relationship together with its endpoint labels
#[derive(Debug, Clone, Copy)]
pub struct RelationshipCandidate<'a> {
    rel: &'a Relationship,
    source_labels: &'a HashSet<Label>,
    target_labels: &'a HashSet<Label>,
}

impl<'a> RelationshipCandidate<'a> {
    /// Returns `None` if either endpoint is missing from the graph
    pub(crate) fn new(state: &'a GraphState, rel: &'a Relationship) -> Option<Self> {
        Some(Self {
            rel,
            source_labels: &state.nodes.get(&rel.source)?.labels,
            target_labels: &state.nodes.get(&rel.target)?.labels,
        })
    }

    pub fn relationship(&self) -> &'a Relationship {
        self.rel
    }
}

impl Candidate for RelationshipCandidate<'_> {
    fn attribute(&self, name: &str) -> Option<&PropertyValue> {
        self.rel.get_property(name)
    }

    fn shape(&self) -> CandidateShape<'_> {
        CandidateShape::Relationship {
            rel_type: &self.rel.rel_type,
            source_labels: self.source_labels,
            target_labels: self.target_labels,
        }
    }

    /// Relationships have no adjacency of their own
    fn related(&self, _name: &str) -> &[EntityUuid] {
        &[]
    }
}
