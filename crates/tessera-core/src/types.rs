//! Core graph types for Tessera
//!
//! Defines the fundamental building blocks: nodes, relationships, labels, and directions.

use crate::id::EntityUuid;
use crate::property::{Property, PropertyValue};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Attribute under which every entity exposes its own identifier
pub const ID_ATTRIBUTE: &str = "id";

/// Attribute under which a relationship exposes its source node identifier
pub const SOURCE_ID_ATTRIBUTE: &str = "sourceId";

/// Attribute under which a relationship exposes its target node identifier
pub const TARGET_ID_ATTRIBUTE: &str = "targetId";

/// A label for nodes or relationship types
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Label(String);

impl Label {
    /// Create a new label
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    /// Get the label name
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Convert to owned string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a relationship traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Outgoing relationship (->)
    Outgoing,
    /// Incoming relationship (<-)
    Incoming,
    /// Both directions (--)
    Both,
}

impl Direction {
    /// Returns the opposite direction
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
            Direction::Both => Direction::Both,
        }
    }
}

/// A node in the property graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: EntityUuid,

    /// Labels attached to this node
    pub labels: HashSet<Label>,

    /// Properties of this node, always including [`ID_ATTRIBUTE`]
    pub properties: Property,
}

impl Node {
    /// Create a new node with the given ID
    pub fn new(id: EntityUuid) -> Self {
        Self::with_labels_and_properties(id, Vec::<Label>::new(), Property::new())
    }

    /// Create a node with labels
    pub fn with_labels<I, L>(id: EntityUuid, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Self::with_labels_and_properties(id, labels, Property::new())
    }

    /// Create a node with labels and properties
    pub fn with_labels_and_properties<I, L>(id: EntityUuid, labels: I, mut properties: Property) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        properties.set(ID_ATTRIBUTE, id);
        Self {
            id,
            labels: labels.into_iter().map(Into::into).collect(),
            properties,
        }
    }

    /// Add a label to this node
    pub fn add_label<L: Into<Label>>(&mut self, label: L) {
        self.labels.insert(label.into());
    }

    /// Remove a label from this node
    pub fn remove_label(&mut self, label: &Label) -> bool {
        self.labels.remove(label)
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// Check if node has a label by name
    pub fn has_label_name(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name() == name)
    }

    /// Set a property. The identifier attribute cannot be overwritten.
    pub fn set_property<K: Into<String>, V: Into<PropertyValue>>(&mut self, key: K, value: V) {
        let key = key.into();
        if key != ID_ATTRIBUTE {
            self.properties.set(key, value);
        }
    }

    /// Get a property
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Remove a property
    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        if key == ID_ATTRIBUTE {
            return None;
        }
        self.properties.remove(key)
    }
}

/// A relationship between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier
    pub id: EntityUuid,

    /// The relationship type (like a label)
    pub rel_type: Label,

    /// Source node ID
    pub source: EntityUuid,

    /// Target node ID
    pub target: EntityUuid,

    /// Properties, always including the id, source and target attributes
    pub properties: Property,
}

impl Relationship {
    /// Create a new relationship
    pub fn new<L: Into<Label>>(
        id: EntityUuid,
        rel_type: L,
        source: EntityUuid,
        target: EntityUuid,
    ) -> Self {
        Self::with_properties(id, rel_type, source, target, Property::new())
    }

    /// Create a relationship with properties
    pub fn with_properties<L: Into<Label>>(
        id: EntityUuid,
        rel_type: L,
        source: EntityUuid,
        target: EntityUuid,
        mut properties: Property,
    ) -> Self {
        properties.set(ID_ATTRIBUTE, id);
        properties.set(SOURCE_ID_ATTRIBUTE, source);
        properties.set(TARGET_ID_ATTRIBUTE, target);
        Self {
            id,
            rel_type: rel_type.into(),
            source,
            target,
            properties,
        }
    }

    /// Get the node ID at the other end of the relationship
    pub fn other(&self, node_id: EntityUuid) -> Option<EntityUuid> {
        if self.source == node_id {
            Some(self.target)
        } else if self.target == node_id {
            Some(self.source)
        } else {
            None
        }
    }

    /// Check if this relationship connects to a node
    pub fn connects(&self, node_id: EntityUuid) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Set a property. Identifier attributes cannot be overwritten.
    pub fn set_property<K: Into<String>, V: Into<PropertyValue>>(&mut self, key: K, value: V) {
        let key = key.into();
        if !is_reserved_relationship_key(&key) {
            self.properties.set(key, value);
        }
    }

    /// Get a property
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

fn is_reserved_relationship_key(key: &str) -> bool {
    matches!(key, ID_ATTRIBUTE | SOURCE_ID_ATTRIBUTE | TARGET_ID_ATTRIBUTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_creation() {
        let label = Label::new("Person");
        assert_eq!(label.name(), "Person");

        let label2: Label = "Company".into();
        assert_eq!(label2.name(), "Company");
    }

    #[test]
    fn test_direction_reverse() {
        assert_eq!(Direction::Outgoing.reverse(), Direction::Incoming);
        assert_eq!(Direction::Incoming.reverse(), Direction::Outgoing);
        assert_eq!(Direction::Both.reverse(), Direction::Both);
    }

    #[test]
    fn test_node_exposes_id_attribute() {
        let id = EntityUuid::new();
        let node = Node::new(id);

        assert!(node.labels.is_empty());
        assert_eq!(
            node.get_property(ID_ATTRIBUTE).and_then(|v| v.as_str()),
            Some(id.to_string().as_str())
        );
    }

    #[test]
    fn test_node_id_attribute_is_protected() {
        let id = EntityUuid::new();
        let mut node = Node::new(id);
        node.set_property(ID_ATTRIBUTE, "other");
        assert!(node.remove_property(ID_ATTRIBUTE).is_none());
        assert_eq!(
            node.get_property(ID_ATTRIBUTE),
            Some(&PropertyValue::from(id))
        );
    }

    #[test]
    fn test_node_with_labels() {
        let node = Node::with_labels(EntityUuid::new(), ["Person", "Employee"]);

        assert!(node.has_label_name("Person"));
        assert!(node.has_label(&Label::new("Employee")));
        assert!(!node.has_label_name("Company"));
    }

    #[test]
    fn test_node_properties() {
        let mut node = Node::new(EntityUuid::new());

        node.set_property("name", "Alice");
        node.set_property("age", 30i64);

        assert_eq!(
            node.get_property("name").and_then(|v| v.as_str()),
            Some("Alice")
        );
        assert_eq!(
            node.get_property("age").and_then(|v| v.as_integer()),
            Some(30)
        );
    }

    #[test]
    fn test_relationship_creation() {
        let source = EntityUuid::new();
        let target = EntityUuid::new();

        let rel = Relationship::new(EntityUuid::new(), "KNOWS", source, target);

        assert_eq!(rel.rel_type.name(), "KNOWS");
        assert_eq!(rel.source, source);
        assert_eq!(rel.target, target);
        assert_eq!(
            rel.get_property(SOURCE_ID_ATTRIBUTE),
            Some(&PropertyValue::from(source))
        );
    }

    #[test]
    fn test_relationship_other() {
        let source = EntityUuid::new();
        let target = EntityUuid::new();
        let other = EntityUuid::new();

        let rel = Relationship::new(EntityUuid::new(), "KNOWS", source, target);

        assert_eq!(rel.other(source), Some(target));
        assert_eq!(rel.other(target), Some(source));
        assert_eq!(rel.other(other), None);
        assert!(rel.connects(source));
        assert!(!rel.connects(other));
    }
}
