//! In-memory graph index

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tessera_core::{Direction, EntityUuid, Error, Label, Node, Property, Relationship, Result};
use tessera_query::PlannerStats;
use tracing::debug;

/// Named outgoing adjacency of one node: relationship type to target ids
pub(crate) type Adjacency = HashMap<String, Vec<EntityUuid>>;

/// Everything the index holds, guarded by one lock
#[derive(Debug, Default)]
pub(crate) struct GraphState {
    pub(crate) nodes: HashMap<EntityUuid, Node>,
    pub(crate) relationships: HashMap<EntityUuid, Relationship>,

    /// Label to node ids
    pub(crate) label_index: HashMap<Label, HashSet<EntityUuid>>,

    /// Relationship type to relationship ids
    pub(crate) rel_type_index: HashMap<Label, HashSet<EntityUuid>>,

    pub(crate) outgoing: HashMap<EntityUuid, Adjacency>,

    /// Node to ids of every relationship touching it, either direction
    incident: HashMap<EntityUuid, HashSet<EntityUuid>>,
}

impl GraphState {
    fn index_node(&mut self, node: &Node) {
        for label in &node.labels {
            self.label_index.entry(label.clone()).or_default().insert(node.id);
        }
    }

    fn unindex_node(&mut self, node: &Node) {
        for label in &node.labels {
            if let Some(ids) = self.label_index.get_mut(label) {
                ids.remove(&node.id);
                if ids.is_empty() {
                    self.label_index.remove(label);
                }
            }
        }
    }

    fn insert_relationship(&mut self, rel: Relationship) {
        self.rel_type_index
            .entry(rel.rel_type.clone())
            .or_default()
            .insert(rel.id);
        self.outgoing
            .entry(rel.source)
            .or_default()
            .entry(rel.rel_type.name().to_string())
            .or_default()
            .push(rel.target);
        self.incident.entry(rel.source).or_default().insert(rel.id);
        self.incident.entry(rel.target).or_default().insert(rel.id);
        self.relationships.insert(rel.id, rel);
    }

    fn remove_relationship(&mut self, rel_id: EntityUuid) -> Option<Relationship> {
        let rel = self.relationships.remove(&rel_id)?;

        if let Some(ids) = self.rel_type_index.get_mut(&rel.rel_type) {
            ids.remove(&rel.id);
            if ids.is_empty() {
                self.rel_type_index.remove(&rel.rel_type);
            }
        }
        if let Some(adjacency) = self.outgoing.get_mut(&rel.source) {
            if let Some(targets) = adjacency.get_mut(rel.rel_type.name()) {
                if let Some(pos) = targets.iter().position(|t| *t == rel.target) {
                    targets.swap_remove(pos);
                }
                if targets.is_empty() {
                    adjacency.remove(rel.rel_type.name());
                }
            }
            if adjacency.is_empty() {
                self.outgoing.remove(&rel.source);
            }
        }
        for endpoint in [rel.source, rel.target] {
            if let Some(ids) = self.incident.get_mut(&endpoint) {
                ids.remove(&rel.id);
                if ids.is_empty() {
                    self.incident.remove(&endpoint);
                }
            }
        }
        Some(rel)
    }

    fn incident_count(&self, node_id: EntityUuid) -> usize {
        self.incident.get(&node_id).map_or(0, HashSet::len)
    }

    pub(crate) fn node_stats(&self) -> PlannerStats {
        let mut stats = PlannerStats::new(self.nodes.len() as u64);
        for (label, ids) in &self.label_index {
            stats.per_label.insert(label.clone(), ids.len() as u64);
        }
        stats
    }

    pub(crate) fn relationship_stats(&self) -> PlannerStats {
        let mut stats = PlannerStats::new(self.relationships.len() as u64);
        for (rel_type, ids) in &self.rel_type_index {
            stats.per_label.insert(rel_type.clone(), ids.len() as u64);
        }
        stats
    }
}

/// An in-memory property graph with label and adjacency indexes
///
/// Cloning is cheap and yields a handle to the same graph.
#[derive(Debug, Clone)]
pub struct MemoryGraph {
    /// Name of the graph
    name: String,

    state: Arc<RwLock<GraphState>>,
}

impl MemoryGraph {
    /// Create an empty graph
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(RwLock::new(GraphState::default())),
        }
    }

    /// Get the graph name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, GraphState>> {
        self.state
            .read()
            .map_err(|_| Error::Internal("Failed to acquire graph read lock".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, GraphState>> {
        self.state
            .write()
            .map_err(|_| Error::Internal("Failed to acquire graph write lock".to_string()))
    }

    // ========== Node Operations ==========

    /// Create a new node with the given labels
    pub fn create_node<I, L>(&self, labels: I) -> Result<Node>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        self.create_node_with_properties(labels, Property::new())
    }

    /// Create a new node with labels and properties
    pub fn create_node_with_properties<I, L>(&self, labels: I, properties: Property) -> Result<Node>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let node = Node::with_labels_and_properties(EntityUuid::new(), labels, properties);
        let mut state = self.write()?;
        state.index_node(&node);
        state.nodes.insert(node.id, node.clone());
        debug!("Created node {} in graph {}", node.id, self.name);
        Ok(node)
    }

    /// Get a node by ID
    pub fn get_node(&self, node_id: EntityUuid) -> Result<Option<Node>> {
        Ok(self.read()?.nodes.get(&node_id).cloned())
    }

    /// Replace a node's labels and properties
    pub fn update_node(&self, node: &Node) -> Result<()> {
        let mut state = self.write()?;
        let previous = state
            .nodes
            .remove(&node.id)
            .ok_or_else(|| Error::NodeNotFound(node.id.to_string()))?;
        state.unindex_node(&previous);

        let mut updated = node.clone();
        updated.properties.set(tessera_core::ID_ATTRIBUTE, node.id);
        state.index_node(&updated);
        state.nodes.insert(updated.id, updated);
        debug!("Updated node {} in graph {}", node.id, self.name);
        Ok(())
    }

    /// Delete a node (must have no relationships)
    pub fn delete_node(&self, node_id: EntityUuid) -> Result<bool> {
        let mut state = self.write()?;
        let attached = state.incident_count(node_id);
        if attached > 0 {
            return Err(Error::InvalidGraphOperation(format!(
                "Cannot delete node {}: has {} relationships. Use detach_delete_node instead.",
                node_id, attached
            )));
        }
        match state.nodes.remove(&node_id) {
            Some(node) => {
                state.unindex_node(&node);
                debug!("Deleted node {} in graph {}", node_id, self.name);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete a node and all its relationships
    pub fn detach_delete_node(&self, node_id: EntityUuid) -> Result<bool> {
        let mut state = self.write()?;
        let rel_ids: Vec<EntityUuid> = state
            .incident
            .get(&node_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();
        for rel_id in &rel_ids {
            state.remove_relationship(*rel_id);
        }
        match state.nodes.remove(&node_id) {
            Some(node) => {
                state.unindex_node(&node);
                debug!(
                    "Detach-deleted node {} and {} relationships in graph {}",
                    node_id,
                    rel_ids.len(),
                    self.name
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Find nodes by label
    pub fn find_nodes_by_label(&self, label: &str) -> Result<Vec<Node>> {
        let state = self.read()?;
        let label = Label::new(label);
        Ok(state
            .label_index
            .get(&label)
            .map(|ids| ids.iter().filter_map(|id| state.nodes.get(id).cloned()).collect())
            .unwrap_or_default())
    }

    /// Get all nodes in this graph
    pub fn get_all_nodes(&self) -> Result<Vec<Node>> {
        Ok(self.read()?.nodes.values().cloned().collect())
    }

    pub fn node_count(&self) -> Result<usize> {
        Ok(self.read()?.nodes.len())
    }

    // ========== Relationship Operations ==========

    /// Create a relationship between two nodes
    pub fn create_relationship<L: Into<Label>>(
        &self,
        source: EntityUuid,
        rel_type: L,
        target: EntityUuid,
    ) -> Result<Relationship> {
        self.create_relationship_with_properties(source, rel_type, target, Property::new())
    }

    /// Create a relationship with properties
    pub fn create_relationship_with_properties<L: Into<Label>>(
        &self,
        source: EntityUuid,
        rel_type: L,
        target: EntityUuid,
        properties: Property,
    ) -> Result<Relationship> {
        let mut state = self.write()?;
        // Verify both nodes exist
        for endpoint in [source, target] {
            if !state.nodes.contains_key(&endpoint) {
                return Err(Error::NodeNotFound(endpoint.to_string()));
            }
        }

        let rel = Relationship::with_properties(EntityUuid::new(), rel_type, source, target, properties);
        state.insert_relationship(rel.clone());
        debug!("Created relationship {} in graph {}", rel.id, self.name);
        Ok(rel)
    }

    /// Get a relationship by ID
    pub fn get_relationship(&self, rel_id: EntityUuid) -> Result<Option<Relationship>> {
        Ok(self.read()?.relationships.get(&rel_id).cloned())
    }

    /// Update a relationship's properties. Type and endpoints are fixed.
    pub fn update_relationship(&self, rel: &Relationship) -> Result<()> {
        let mut state = self.write()?;
        let stored = state
            .relationships
            .get_mut(&rel.id)
            .ok_or_else(|| Error::RelationshipNotFound(rel.id.to_string()))?;

        if stored.rel_type != rel.rel_type || stored.source != rel.source || stored.target != rel.target {
            return Err(Error::InvalidGraphOperation(format!(
                "Cannot change type or endpoints of relationship {}",
                rel.id
            )));
        }
        *stored = Relationship::with_properties(
            rel.id,
            rel.rel_type.clone(),
            rel.source,
            rel.target,
            rel.properties.clone(),
        );
        debug!("Updated relationship {} in graph {}", rel.id, self.name);
        Ok(())
    }

    /// Delete a relationship
    pub fn delete_relationship(&self, rel_id: EntityUuid) -> Result<bool> {
        Ok(self.write()?.remove_relationship(rel_id).is_some())
    }

    pub fn relationship_count(&self) -> Result<usize> {
        Ok(self.read()?.relationships.len())
    }

    /// Get relationships from a node
    pub fn get_relationships(&self, node_id: EntityUuid, direction: Direction) -> Result<Vec<Relationship>> {
        let state = self.read()?;
        let Some(ids) = state.incident.get(&node_id) else {
            return Ok(Vec::new());
        };
        let mut rels: Vec<Relationship> = ids
            .iter()
            .filter_map(|id| state.relationships.get(id))
            .filter(|rel| match direction {
                Direction::Outgoing => rel.source == node_id,
                Direction::Incoming => rel.target == node_id,
                Direction::Both => true,
            })
            .cloned()
            .collect();
        rels.sort_by_key(|rel| rel.id);
        Ok(rels)
    }

    /// Get neighbors of a node
    pub fn get_neighbors(&self, node_id: EntityUuid, direction: Direction) -> Result<Vec<Node>> {
        let rels = self.get_relationships(node_id, direction)?;
        let state = self.read()?;
        Ok(rels
            .iter()
            .filter_map(|rel| {
                let neighbor = match direction {
                    Direction::Outgoing => rel.target,
                    Direction::Incoming => rel.source,
                    Direction::Both => rel.other(node_id).unwrap_or(rel.target),
                };
                state.nodes.get(&neighbor).cloned()
            })
            .collect())
    }

    // ========== Statistics ==========

    /// Node counts per label, for scan planning
    pub fn node_stats(&self) -> Result<PlannerStats> {
        Ok(self.read()?.node_stats())
    }

    /// Relationship counts per type, for scan planning
    pub fn relationship_stats(&self) -> Result<PlannerStats> {
        Ok(self.read()?.relationship_stats())
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new("default")
    }
}
