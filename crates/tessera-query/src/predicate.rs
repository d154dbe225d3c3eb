//! Abstract search predicates
//!
//! The input side of query compilation. A search request arrives as an
//! ordered list of [`SearchPredicate`]s produced by the caller's attribute
//! layer; the translators only ever read them.

use serde::{Deserialize, Serialize};
use std::fmt;
use tessera_core::{Label, PropertyValue, Result, ValueKind};

/// Boolean role a predicate played in the caller's original request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occurrence {
    /// The predicate must hold
    #[default]
    Must,
    /// The predicate may hold
    Should,
    /// The predicate must not hold
    MustNot,
}

/// Comparison operation of a [`PredicateKind::Comparison`] predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    IsNull,
    IsNotNull,
    StartsWith,
    EndsWith,
    Contains,
    CaseInsensitiveStartsWith,
    CaseInsensitiveEndsWith,
    CaseInsensitiveContains,
}

impl Operation {
    /// Operations that are accepted but not evaluated (they always match)
    pub fn is_passthrough(self) -> bool {
        matches!(
            self,
            Operation::StartsWith
                | Operation::EndsWith
                | Operation::Contains
                | Operation::CaseInsensitiveStartsWith
                | Operation::CaseInsensitiveEndsWith
        )
    }

    /// Name as used in request syntax
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Equal => "equal",
            Operation::NotEqual => "notEqual",
            Operation::Greater => "greater",
            Operation::GreaterOrEqual => "greaterOrEqual",
            Operation::Less => "less",
            Operation::LessOrEqual => "lessOrEqual",
            Operation::IsNull => "isNull",
            Operation::IsNotNull => "isNotNull",
            Operation::StartsWith => "startsWith",
            Operation::EndsWith => "endsWith",
            Operation::Contains => "contains",
            Operation::CaseInsensitiveStartsWith => "caseInsensitiveStartsWith",
            Operation::CaseInsensitiveEndsWith => "caseInsensitiveEndsWith",
            Operation::CaseInsensitiveContains => "caseInsensitiveContains",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean operator of a composite predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupOperator {
    And,
    Or,
    /// Negates the enclosing group; does not open a group of its own
    Not,
}

/// A named attribute together with its declared kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: ValueKind,
}

impl Attribute {
    pub fn new<S: Into<String>>(name: S, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The kind-specific payload of a search predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredicateKind {
    Comparison {
        attribute: Attribute,
        operation: Operation,
        value: PropertyValue,
    },
    Range {
        attribute: Attribute,
        lower: Option<PropertyValue>,
        upper: Option<PropertyValue>,
        include_lower: bool,
        include_upper: bool,
    },
    Keyword {
        attribute: Attribute,
        value: PropertyValue,
        exact: bool,
    },
    Type {
        label: Label,
        source: Option<Label>,
        target: Option<Label>,
    },
    Uuid {
        name: String,
        literal: String,
    },
    Group {
        operator: GroupOperator,
        children: Vec<SearchPredicate>,
    },
    Relationship {
        name: String,
        values: Vec<PropertyValue>,
    },
    ArrayMember {
        attribute: Attribute,
        value: PropertyValue,
    },
    Spatial {
        latitude: f64,
        longitude: f64,
        distance_km: f64,
    },
}

impl PredicateKind {
    /// Short name of the predicate kind, used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            PredicateKind::Comparison { .. } => "comparison",
            PredicateKind::Range { .. } => "range",
            PredicateKind::Keyword { .. } => "keyword",
            PredicateKind::Type { .. } => "type",
            PredicateKind::Uuid { .. } => "uuid",
            PredicateKind::Group { .. } => "group",
            PredicateKind::Relationship { .. } => "relationship",
            PredicateKind::ArrayMember { .. } => "array",
            PredicateKind::Spatial { .. } => "spatial",
        }
    }
}

/// One abstract search predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPredicate {
    pub occurrence: Occurrence,
    pub kind: PredicateKind,
}

impl SearchPredicate {
    /// Create a predicate with [`Occurrence::Must`]
    pub fn new(kind: PredicateKind) -> Self {
        Self {
            occurrence: Occurrence::Must,
            kind,
        }
    }

    /// Set the occurrence
    pub fn with_occurrence(mut self, occurrence: Occurrence) -> Self {
        self.occurrence = occurrence;
        self
    }

    /// Shorthand for `with_occurrence(Occurrence::MustNot)`
    pub fn must_not(self) -> Self {
        self.with_occurrence(Occurrence::MustNot)
    }

    /// Shorthand for `with_occurrence(Occurrence::Should)`
    pub fn should(self) -> Self {
        self.with_occurrence(Occurrence::Should)
    }

    pub fn comparison<S, V>(name: S, kind: ValueKind, operation: Operation, value: V) -> Self
    where
        S: Into<String>,
        V: Into<PropertyValue>,
    {
        Self::new(PredicateKind::Comparison {
            attribute: Attribute::new(name, kind),
            operation,
            value: value.into(),
        })
    }

    pub fn equal<S: Into<String>, V: Into<PropertyValue>>(name: S, kind: ValueKind, value: V) -> Self {
        Self::comparison(name, kind, Operation::Equal, value)
    }

    /// Inclusive range on both ends
    pub fn range<S: Into<String>>(
        name: S,
        kind: ValueKind,
        lower: Option<PropertyValue>,
        upper: Option<PropertyValue>,
    ) -> Self {
        Self::range_with(name, kind, lower, upper, true, true)
    }

    pub fn range_with<S: Into<String>>(
        name: S,
        kind: ValueKind,
        lower: Option<PropertyValue>,
        upper: Option<PropertyValue>,
        include_lower: bool,
        include_upper: bool,
    ) -> Self {
        Self::new(PredicateKind::Range {
            attribute: Attribute::new(name, kind),
            lower,
            upper,
            include_lower,
            include_upper,
        })
    }

    pub fn keyword<S: Into<String>, V: Into<PropertyValue>>(
        name: S,
        kind: ValueKind,
        value: V,
        exact: bool,
    ) -> Self {
        Self::new(PredicateKind::Keyword {
            attribute: Attribute::new(name, kind),
            value: value.into(),
            exact,
        })
    }

    /// Node type predicate
    pub fn of_type<L: Into<Label>>(label: L) -> Self {
        Self::new(PredicateKind::Type {
            label: label.into(),
            source: None,
            target: None,
        })
    }

    /// Relationship type predicate constrained by endpoint labels
    pub fn relationship_type<L, S, T>(label: L, source: S, target: T) -> Self
    where
        L: Into<Label>,
        S: Into<Label>,
        T: Into<Label>,
    {
        Self::new(PredicateKind::Type {
            label: label.into(),
            source: Some(source.into()),
            target: Some(target.into()),
        })
    }

    pub fn uuid<S: Into<String>, L: Into<String>>(name: S, literal: L) -> Self {
        Self::new(PredicateKind::Uuid {
            name: name.into(),
            literal: literal.into(),
        })
    }

    pub fn group(operator: GroupOperator, children: Vec<SearchPredicate>) -> Self {
        Self::new(PredicateKind::Group { operator, children })
    }

    pub fn and(children: Vec<SearchPredicate>) -> Self {
        Self::group(GroupOperator::And, children)
    }

    pub fn or(children: Vec<SearchPredicate>) -> Self {
        Self::group(GroupOperator::Or, children)
    }

    pub fn not(children: Vec<SearchPredicate>) -> Self {
        Self::group(GroupOperator::Not, children)
    }

    /// Entities related through `name` to any of `values`
    pub fn related<S: Into<String>>(name: S, values: Vec<PropertyValue>) -> Self {
        Self::new(PredicateKind::Relationship {
            name: name.into(),
            values,
        })
    }

    pub fn array_contains<S: Into<String>, V: Into<PropertyValue>>(
        name: S,
        kind: ValueKind,
        value: V,
    ) -> Self {
        Self::new(PredicateKind::ArrayMember {
            attribute: Attribute::new(name, kind),
            value: value.into(),
        })
    }

    /// Decompose an array-valued constraint into one membership predicate
    /// per element, all of which must hold.
    pub fn array_contains_all<S, I, V>(name: S, kind: ValueKind, values: I) -> Vec<SearchPredicate>
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<PropertyValue>,
    {
        let name = name.into();
        values
            .into_iter()
            .map(|value| Self::array_contains(name.clone(), kind, value))
            .collect()
    }

    pub fn spatial(latitude: f64, longitude: f64, distance_km: f64) -> Self {
        Self::new(PredicateKind::Spatial {
            latitude,
            longitude,
            distance_km,
        })
    }

    /// Short name of the predicate kind
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns true for composite (group) predicates
    pub fn is_group(&self) -> bool {
        matches!(self.kind, PredicateKind::Group { .. })
    }

    /// Returns true for AND and OR composites, which open a group of their own
    pub fn opens_group(&self) -> bool {
        matches!(
            self.kind,
            PredicateKind::Group {
                operator: GroupOperator::And | GroupOperator::Or,
                ..
            }
        )
    }

    /// Read an ordered predicate list from its JSON form
    pub fn list_from_json(json: &str) -> Result<Vec<SearchPredicate>> {
        Ok(serde_json::from_str(json)?)
    }
}
