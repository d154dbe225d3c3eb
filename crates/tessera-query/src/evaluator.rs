//! Expression evaluation
//!
//! A pure walk of a finished tree against one candidate entity. No leaf can
//! fail: an attribute of the wrong kind for its comparison simply makes that
//! leaf false, and the walk carries on.

use crate::expr::{Expr, Group, GroupKind, Leaf, UuidTarget};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tessera_core::{EntityUuid, Label, Property, PropertyValue};

/// Label facts of a candidate
#[derive(Debug, Clone, Copy)]
pub enum CandidateShape<'a> {
    Node {
        labels: &'a HashSet<Label>,
    },
    Relationship {
        rel_type: &'a Label,
        source_labels: &'a HashSet<Label>,
        target_labels: &'a HashSet<Label>,
    },
}

/// Read-only view of an entity under test
pub trait Candidate {
    /// Attribute lookup; `None` is treated as null
    fn attribute(&self, name: &str) -> Option<&PropertyValue>;

    /// Labels (nodes) or type and endpoint labels (relationships)
    fn shape(&self) -> CandidateShape<'_>;

    /// Identifiers reachable through the named relationship
    fn related(&self, name: &str) -> &[EntityUuid];
}

/// Evaluate a finished query tree against a candidate
pub fn evaluate<C: Candidate + ?Sized>(root: &Group, candidate: &C) -> bool {
    evaluate_group(root, candidate)
}

pub fn evaluate_expr<C: Candidate + ?Sized>(expr: &Expr, candidate: &C) -> bool {
    match expr {
        Expr::Leaf(leaf) => evaluate_leaf(leaf, candidate),
        Expr::Group(group) => evaluate_group(group, candidate),
    }
}

fn evaluate_group<C: Candidate + ?Sized>(group: &Group, candidate: &C) -> bool {
    let verdict = match group.kind {
        GroupKind::And => group.children.iter().all(|c| evaluate_expr(c, candidate)),
        GroupKind::Or => group.children.iter().any(|c| evaluate_expr(c, candidate)),
    };
    verdict != group.negated
}

static NULL: PropertyValue = PropertyValue::Null;

fn lookup<'a, C: Candidate + ?Sized>(candidate: &'a C, name: &str) -> &'a PropertyValue {
    candidate.attribute(name).unwrap_or(&NULL)
}

pub fn evaluate_leaf<C: Candidate + ?Sized>(leaf: &Leaf, candidate: &C) -> bool {
    match leaf {
        Leaf::Equals { name, value } => {
            let actual = lookup(candidate, name);
            if is_null_or_empty(value) {
                is_null_or_empty(actual)
            } else {
                actual.matches(value)
            }
        }

        Leaf::Range {
            name,
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
        } => in_range(
            lookup(candidate, name),
            lower.as_ref(),
            upper.as_ref(),
            *lower_inclusive,
            *upper_inclusive,
        ),

        Leaf::IsNull { name } => lookup(candidate, name).is_null(),

        Leaf::Not(inner) => !evaluate_expr(inner, candidate),

        Leaf::SubstringContains {
            name,
            text,
            case_insensitive,
        } => match lookup(candidate, name) {
            PropertyValue::String(actual) if *case_insensitive => {
                actual.to_lowercase().contains(&text.to_lowercase())
            }
            PropertyValue::String(actual) => actual.contains(text.as_str()),
            _ => false,
        },

        Leaf::LabelMatch {
            label,
            source,
            target,
        } => label_matches(candidate.shape(), label, source.as_ref(), target.as_ref()),

        Leaf::RelationshipPresence { name, expected } => {
            let related = candidate.related(name);
            let wanted: Vec<&PropertyValue> = expected.iter().filter(|v| !v.is_blank()).collect();
            if wanted.is_empty() {
                return related.is_empty();
            }
            related
                .iter()
                .any(|id| wanted.iter().any(|value| identifier_matches(id, value)))
        }

        Leaf::RelationshipAbsence { name } => candidate.related(name).is_empty(),

        Leaf::ArrayContains { name, value } => match lookup(candidate, name) {
            PropertyValue::Array(items) => items.iter().any(|item| item.matches(value)),
            _ => false,
        },

        Leaf::UuidEquals { name, target } => match target {
            UuidTarget::Impossible => false,
            UuidTarget::Literal(expected) => lookup(candidate, name)
                .as_str()
                .and_then(EntityUuid::parse_canonical)
                .is_some_and(|actual| actual == *expected),
        },

        Leaf::Passthrough { .. } => true,
    }
}

/// Null and the empty string are the same absent value for equality
fn is_null_or_empty(value: &PropertyValue) -> bool {
    match value {
        PropertyValue::Null => true,
        PropertyValue::String(s) => s.is_empty(),
        _ => false,
    }
}

fn in_range(
    actual: &PropertyValue,
    lower: Option<&PropertyValue>,
    upper: Option<&PropertyValue>,
    lower_inclusive: bool,
    upper_inclusive: bool,
) -> bool {
    if actual.is_null() {
        return false;
    }
    let lower_ok = match lower {
        None => true,
        Some(bound) => match actual.compare(bound) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => lower_inclusive,
            _ => false,
        },
    };
    let upper_ok = match upper {
        None => true,
        Some(bound) => match actual.compare(bound) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => upper_inclusive,
            _ => false,
        },
    };
    lower_ok && upper_ok
}

fn label_matches(
    shape: CandidateShape<'_>,
    label: &Label,
    source: Option<&Label>,
    target: Option<&Label>,
) -> bool {
    match (shape, source, target) {
        (CandidateShape::Node { labels }, None, None) => labels.contains(label),
        (CandidateShape::Node { .. }, _, _) => false,
        (
            CandidateShape::Relationship {
                rel_type,
                source_labels,
                target_labels,
            },
            Some(source),
            Some(target),
        ) => rel_type == label && source_labels.contains(source) && target_labels.contains(target),
        (CandidateShape::Relationship { rel_type, .. }, _, _) => rel_type == label,
    }
}

fn identifier_matches(id: &EntityUuid, value: &PropertyValue) -> bool {
    value
        .as_str()
        .and_then(EntityUuid::parse_canonical)
        .is_some_and(|expected| expected == *id)
}

#[derive(Debug, Clone)]
enum StaticShape {
    Node(HashSet<Label>),
    Relationship {
        rel_type: Label,
        source_labels: HashSet<Label>,
        target_labels: HashSet<Label>,
    },
}

/// A self-contained candidate, for callers that keep entities outside a graph
#[derive(Debug, Clone)]
pub struct StaticCandidate {
    attributes: Property,
    shape: StaticShape,
    adjacency: HashMap<String, Vec<EntityUuid>>,
}

impl StaticCandidate {
    /// A node candidate with the given labels
    pub fn node<I, L>(labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Self {
            attributes: Property::new(),
            shape: StaticShape::Node(labels.into_iter().map(Into::into).collect()),
            adjacency: HashMap::new(),
        }
    }

    /// A relationship candidate with one label on each endpoint
    pub fn relationship<L, S, T>(rel_type: L, source: S, target: T) -> Self
    where
        L: Into<Label>,
        S: Into<Label>,
        T: Into<Label>,
    {
        Self {
            attributes: Property::new(),
            shape: StaticShape::Relationship {
                rel_type: rel_type.into(),
                source_labels: HashSet::from([source.into()]),
                target_labels: HashSet::from([target.into()]),
            },
            adjacency: HashMap::new(),
        }
    }

    /// Builder: set an attribute
    pub fn with<K: Into<String>, V: Into<PropertyValue>>(mut self, key: K, value: V) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// Builder: add related identifiers under `name`
    pub fn with_related<K: Into<String>>(mut self, name: K, ids: Vec<EntityUuid>) -> Self {
        self.adjacency.entry(name.into()).or_default().extend(ids);
        self
    }
}

impl Candidate for StaticCandidate {
    fn attribute(&self, name: &str) -> Option<&PropertyValue> {
        self.attributes.get(name)
    }

    fn shape(&self) -> CandidateShape<'_> {
        match &self.shape {
            StaticShape::Node(labels) => CandidateShape::Node { labels },
            StaticShape::Relationship {
                rel_type,
                source_labels,
                target_labels,
            } => CandidateShape::Relationship {
                rel_type,
                source_labels,
                target_labels,
            },
        }
    }

    fn related(&self, name: &str) -> &[EntityUuid] {
        self.adjacency.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}
