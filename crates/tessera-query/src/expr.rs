//! Expression tree
//!
//! Leaves are atomic tests against one attribute, label set or relationship
//! fact of a candidate. Groups combine children under AND or OR and may be
//! negated. A finished tree is never mutated.

use crate::predicate::Operation;
use std::fmt;
use tessera_core::{EntityUuid, Label, PropertyValue};

/// Boolean combinator of a [`Group`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    And,
    Or,
}

/// Right-hand side of a [`Leaf::UuidEquals`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UuidTarget {
    /// A literal in canonical identifier format
    Literal(EntityUuid),
    /// Stands in for a malformed literal; equal to no identifier
    Impossible,
}

impl UuidTarget {
    pub fn parse(literal: &str) -> Self {
        EntityUuid::parse_canonical(literal)
            .map(UuidTarget::Literal)
            .unwrap_or(UuidTarget::Impossible)
    }
}

/// An atomic test
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Equals {
        name: String,
        value: PropertyValue,
    },
    Range {
        name: String,
        lower: Option<PropertyValue>,
        upper: Option<PropertyValue>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    },
    IsNull {
        name: String,
    },
    Not(Box<Expr>),
    SubstringContains {
        name: String,
        text: String,
        case_insensitive: bool,
    },
    LabelMatch {
        label: Label,
        source: Option<Label>,
        target: Option<Label>,
    },
    RelationshipPresence {
        name: String,
        expected: Vec<PropertyValue>,
    },
    RelationshipAbsence {
        name: String,
    },
    ArrayContains {
        name: String,
        value: PropertyValue,
    },
    UuidEquals {
        name: String,
        target: UuidTarget,
    },
    /// An operation that is accepted but not evaluated; always true
    Passthrough {
        name: String,
        operation: Operation,
    },
}

impl Leaf {
    pub fn equals<S: Into<String>, V: Into<PropertyValue>>(name: S, value: V) -> Self {
        Leaf::Equals {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn is_null<S: Into<String>>(name: S) -> Self {
        Leaf::IsNull { name: name.into() }
    }

    /// Wrap any expression in a negation
    pub fn not<E: Into<Expr>>(inner: E) -> Self {
        Leaf::Not(Box::new(inner.into()))
    }

    pub fn contains<S: Into<String>, T: Into<String>>(name: S, text: T, case_insensitive: bool) -> Self {
        Leaf::SubstringContains {
            name: name.into(),
            text: text.into(),
            case_insensitive,
        }
    }

    pub fn label<L: Into<Label>>(label: L) -> Self {
        Leaf::LabelMatch {
            label: label.into(),
            source: None,
            target: None,
        }
    }

    /// Returns true for a node-type label match (no endpoint constraints)
    pub fn is_node_label_match(&self) -> bool {
        matches!(
            self,
            Leaf::LabelMatch {
                source: None,
                target: None,
                ..
            }
        )
    }
}

/// A boolean combination of children
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub kind: GroupKind,
    pub negated: bool,
    pub children: Vec<Expr>,
}

impl Group {
    pub fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            negated: false,
            children: Vec::new(),
        }
    }

    pub fn and(children: Vec<Expr>) -> Self {
        Self {
            kind: GroupKind::And,
            negated: false,
            children,
        }
    }

    pub fn or(children: Vec<Expr>) -> Self {
        Self {
            kind: GroupKind::Or,
            negated: false,
            children,
        }
    }

    /// Builder: set the negation flag
    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of leaves in this subtree matching `pred`, including nested ones
    pub fn count_leaves<F>(&self, pred: &F) -> usize
    where
        F: Fn(&Leaf) -> bool,
    {
        self.children.iter().map(|child| child.count_leaves(pred)).sum()
    }
}

/// A node of the expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Leaf(Leaf),
    Group(Group),
}

impl Expr {
    pub fn count_leaves<F>(&self, pred: &F) -> usize
    where
        F: Fn(&Leaf) -> bool,
    {
        match self {
            Expr::Leaf(leaf) => {
                let nested = match leaf {
                    Leaf::Not(inner) => inner.count_leaves(pred),
                    _ => 0,
                };
                usize::from(pred(leaf)) + nested
            }
            Expr::Group(group) => group.count_leaves(pred),
        }
    }
}

impl From<Leaf> for Expr {
    fn from(leaf: Leaf) -> Self {
        Expr::Leaf(leaf)
    }
}

impl From<Group> for Expr {
    fn from(group: Group) -> Self {
        Expr::Group(group)
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leaf::Equals { name, value } => write!(f, "{} = {}", name, value),
            Leaf::Range {
                name,
                lower,
                upper,
                lower_inclusive,
                upper_inclusive,
            } => {
                let open = if *lower_inclusive { '[' } else { '(' };
                let close = if *upper_inclusive { ']' } else { ')' };
                let lower = lower.as_ref().map(ToString::to_string).unwrap_or_else(|| "*".into());
                let upper = upper.as_ref().map(ToString::to_string).unwrap_or_else(|| "*".into());
                write!(f, "{} IN {}{}, {}{}", name, open, lower, upper, close)
            }
            Leaf::IsNull { name } => write!(f, "{} IS NULL", name),
            Leaf::Not(inner) => write!(f, "NOT {}", inner),
            Leaf::SubstringContains {
                name,
                text,
                case_insensitive,
            } => {
                let op = if *case_insensitive { "ICONTAINS" } else { "CONTAINS" };
                write!(f, "{} {} {:?}", name, op, text)
            }
            Leaf::LabelMatch {
                label,
                source: Some(source),
                target: Some(target),
            } => write!(f, "(:{})-[:{}]->(:{})", source, label, target),
            Leaf::LabelMatch { label, .. } => write!(f, ":{}", label),
            Leaf::RelationshipPresence { name, expected } => {
                write!(f, "{} -> {}", name, PropertyValue::Array(expected.clone()))
            }
            Leaf::RelationshipAbsence { name } => write!(f, "{} -> NONE", name),
            Leaf::ArrayContains { name, value } => write!(f, "{} IN {}", value, name),
            Leaf::UuidEquals {
                name,
                target: UuidTarget::Literal(id),
            } => write!(f, "{} = {}", name, id),
            Leaf::UuidEquals {
                name,
                target: UuidTarget::Impossible,
            } => write!(f, "{} = <invalid>", name),
            Leaf::Passthrough { name, operation } => write!(f, "TRUE /* {} {} */", name, operation),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "NOT ")?;
        }
        if self.children.is_empty() {
            return match self.kind {
                GroupKind::And => write!(f, "TRUE"),
                GroupKind::Or => write!(f, "FALSE"),
            };
        }
        let sep = match self.kind {
            GroupKind::And => " AND ",
            GroupKind::Or => " OR ",
        };
        write!(f, "(")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Leaf(leaf) => write!(f, "{}", leaf),
            Expr::Group(group) => write!(f, "{}", group),
        }
    }
}
