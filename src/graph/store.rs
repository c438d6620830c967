//! In-memory graph storage implementation
//!
//! The store is a passive, thread-safe object: one reader/writer lock guards
//! the node and edge tables. Reads copy what they need out of the tables under
//! the shared lock; every mutation, including the endpoint checks of
//! `add_edge` and the adjacency updates of `remove_edge`, runs inside a single
//! exclusive critical section.

use super::cursor::Cursor;
use super::edge::Edge;
use super::node::Node;
use super::property::{matches_all, PropertyMap};
use super::types::{EdgeId, Label, NodeId};
use crate::config::DraftConfig;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, trace};

/// `sub_graph` depth meaning "no depth cap"
pub const UNLIMITED: usize = 0;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Node {0} already exists")]
    NodeAlreadyExists(NodeId),

    #[error("Edge {0} already exists")]
    EdgeAlreadyExists(EdgeId),

    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(NodeId),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(NodeId),

    #[error("Can not remove node {id} with edges attached (edge count: {count})")]
    NodeHasEdges { id: NodeId, count: usize },

    #[error("Edge {0} can not change its source or target")]
    EdgeEndpointChanged(EdgeId),
}

impl GraphError {
    /// The UID is already taken in the relevant table
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            GraphError::NodeAlreadyExists(_) | GraphError::EdgeAlreadyExists(_)
        )
    }

    /// A referenced node or edge is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::NodeNotFound(_)
                | GraphError::EdgeNotFound(_)
                | GraphError::InvalidEdgeSource(_)
                | GraphError::InvalidEdgeTarget(_)
        )
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Point-in-time counters for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub start_time: DateTime<Utc>,
    pub uptime_secs: i64,
    pub node_count: usize,
    pub edge_count: usize,
    pub available_parallelism: usize,
}

/// The tables guarded by the store lock. Both are insertion ordered, which
/// gives cursors and dumps a deterministic order.
#[derive(Debug, Default)]
pub(crate) struct GraphTables {
    pub(crate) nodes: IndexMap<NodeId, Node>,
    pub(crate) edges: IndexMap<EdgeId, Edge>,
}

/// In-memory graph storage
///
/// - nodes: NodeId -> Node (each node carries its inbound/outbound edge UIDs)
/// - edges: EdgeId -> Edge
#[derive(Debug)]
pub struct GraphStore {
    tables: RwLock<GraphTables>,

    /// Creation time, diagnostics only
    start_time: DateTime<Utc>,

    /// Snapshot size at which `nodes_by` filters in parallel
    parallel_filter_threshold: usize,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::with_config(&DraftConfig::default())
    }

    /// Create a new empty graph store tuned by `config`
    pub fn with_config(config: &DraftConfig) -> Self {
        GraphStore {
            tables: RwLock::new(GraphTables::default()),
            start_time: Utc::now(),
            parallel_filter_threshold: config.parallel_filter_threshold,
        }
    }

    /// An empty store sharing this store's tuning, used for subgraphs and
    /// query results
    pub(crate) fn empty_like(&self) -> Self {
        GraphStore {
            tables: RwLock::new(GraphTables::default()),
            start_time: Utc::now(),
            parallel_filter_threshold: self.parallel_filter_threshold,
        }
    }

    // A panic while holding the lock cannot leave the tables half-updated:
    // every mutation validates first and then applies infallible map updates.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, GraphTables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GraphTables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Add a node with empty adjacency sets
    pub fn add_node(
        &self,
        id: impl Into<NodeId>,
        label: impl Into<Label>,
        properties: PropertyMap,
    ) -> GraphResult<Node> {
        let node = Node::new_with_properties(id, label, properties);
        let mut tables = self.write();

        if tables.nodes.contains_key(&node.id) {
            return Err(GraphError::NodeAlreadyExists(node.id));
        }

        tables.nodes.insert(node.id.clone(), node.clone());
        debug!(node = %node.id, label = %node.label, "node added");
        Ok(node)
    }

    pub fn has_node(&self, id: impl AsRef<str>) -> bool {
        self.read().nodes.contains_key(id.as_ref())
    }

    /// Get a copy of the node with the given UID
    pub fn get_node(&self, id: impl AsRef<str>) -> GraphResult<Node> {
        let id = id.as_ref();
        self.read()
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::NodeNotFound(NodeId::new(id)))
    }

    /// Replace a node's label and properties.
    ///
    /// The adjacency sets tracked by the store are kept; whatever adjacency the
    /// caller's copy carries is discarded.
    pub fn update_node(&self, mut node: Node) -> GraphResult<Node> {
        let mut tables = self.write();
        let slot = tables
            .nodes
            .get_mut(&node.id)
            .ok_or_else(|| GraphError::NodeNotFound(node.id.clone()))?;

        node.clear_adjacency();
        let previous = std::mem::replace(slot, node);
        slot.adopt_adjacency(previous);

        debug!(node = %slot.id, "node updated");
        Ok(slot.clone())
    }

    /// Remove a node. Refused while any edge references it; there is no
    /// cascading delete.
    pub fn remove_node(&self, id: impl AsRef<str>) -> GraphResult<()> {
        let id = id.as_ref();
        let mut tables = self.write();

        let node = tables
            .nodes
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound(NodeId::new(id)))?;

        let count = node.edge_count();
        if count > 0 {
            return Err(GraphError::NodeHasEdges {
                id: node.id.clone(),
                count,
            });
        }

        tables.nodes.shift_remove(id);
        debug!(node = id, "node removed");
        Ok(())
    }

    /// Add a directed edge `source -> target` and register it in both
    /// endpoints' adjacency sets.
    pub fn add_edge(
        &self,
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        label: impl Into<Label>,
        target: impl Into<NodeId>,
        properties: PropertyMap,
    ) -> GraphResult<Edge> {
        let edge = Edge::new_with_properties(id, source, label, target, properties);
        let mut tables = self.write();

        if !tables.nodes.contains_key(&edge.source) {
            return Err(GraphError::InvalidEdgeSource(edge.source));
        }
        if !tables.nodes.contains_key(&edge.target) {
            return Err(GraphError::InvalidEdgeTarget(edge.target));
        }
        if tables.edges.contains_key(&edge.id) {
            return Err(GraphError::EdgeAlreadyExists(edge.id));
        }

        // (source)->(target)
        if let Some(source) = tables.nodes.get_mut(&edge.source) {
            source.attach_outbound(edge.id.clone());
        }
        if let Some(target) = tables.nodes.get_mut(&edge.target) {
            target.attach_inbound(edge.id.clone());
        }
        tables.edges.insert(edge.id.clone(), edge.clone());

        debug!(
            edge = %edge.id,
            source = %edge.source,
            target = %edge.target,
            label = %edge.label,
            "edge added"
        );
        Ok(edge)
    }

    pub fn has_edge(&self, id: impl AsRef<str>) -> bool {
        self.read().edges.contains_key(id.as_ref())
    }

    /// Get a copy of the edge with the given UID
    pub fn get_edge(&self, id: impl AsRef<str>) -> GraphResult<Edge> {
        let id = id.as_ref();
        self.read()
            .edges
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::EdgeNotFound(EdgeId::new(id)))
    }

    /// Replace an edge's label and properties. Source and target are part of
    /// the edge's identity and can not be changed.
    pub fn update_edge(&self, edge: Edge) -> GraphResult<Edge> {
        let mut tables = self.write();
        let slot = tables
            .edges
            .get_mut(&edge.id)
            .ok_or_else(|| GraphError::EdgeNotFound(edge.id.clone()))?;

        if slot.source != edge.source || slot.target != edge.target {
            return Err(GraphError::EdgeEndpointChanged(edge.id));
        }

        *slot = edge.clone();
        debug!(edge = %edge.id, "edge updated");
        Ok(edge)
    }

    /// Remove an edge, deregistering it from both endpoints first
    pub fn remove_edge(&self, id: impl AsRef<str>) -> GraphResult<()> {
        let id = id.as_ref();
        let mut tables = self.write();

        let edge = tables
            .edges
            .shift_remove(id)
            .ok_or_else(|| GraphError::EdgeNotFound(EdgeId::new(id)))?;

        if let Some(source) = tables.nodes.get_mut(&edge.source) {
            source.detach_outbound(&edge.id);
        }
        if let Some(target) = tables.nodes.get_mut(&edge.target) {
            target.detach_inbound(&edge.id);
        }

        debug!(edge = id, "edge removed");
        Ok(())
    }

    /// Snapshot cursor over all nodes, in insertion order
    pub fn nodes(&self) -> Cursor<Node> {
        Cursor::new(self.read().nodes.values().cloned().collect())
    }

    /// Snapshot cursor over all edges, in insertion order
    pub fn edges(&self) -> Cursor<Edge> {
        Cursor::new(self.read().edges.values().cloned().collect())
    }

    pub fn node_count(&self) -> usize {
        self.read().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.read().edges.len()
    }

    /// Nodes matching ANY of `labels` (empty set: any label) AND ALL of
    /// `properties` by exact byte equality (empty map: any properties).
    ///
    /// Filtering runs over a copied snapshot, outside the lock. Large
    /// snapshots are filtered in parallel; the result order is the snapshot
    /// order either way.
    pub fn nodes_by(&self, labels: &HashSet<Label>, properties: &PropertyMap) -> Cursor<Node> {
        let snapshot: Vec<Node> = self.read().nodes.values().cloned().collect();
        let total = snapshot.len();

        let label_match = |node: &Node| labels.is_empty() || labels.contains(&node.label);
        let property_match = |node: &Node| matches_all(&node.properties, properties);

        let matched: Vec<Node> = if total >= self.parallel_filter_threshold {
            snapshot
                .into_par_iter()
                .filter(|node| label_match(node))
                .filter(|node| property_match(node))
                .collect()
        } else {
            snapshot
                .into_iter()
                .filter(|node| label_match(node))
                .filter(|node| property_match(node))
                .collect()
        };

        trace!(total, matched = matched.len(), "nodes_by filtered snapshot");
        Cursor::new(matched)
    }

    /// Nodes carrying `label`
    pub fn nodes_by_label(&self, label: impl Into<Label>) -> Cursor<Node> {
        let labels = HashSet::from([label.into()]);
        self.nodes_by(&labels, &PropertyMap::new())
    }

    /// Edges leaving the node: (n)-->()
    pub fn outgoing_edges(&self, id: impl AsRef<str>) -> GraphResult<Vec<Edge>> {
        self.incident_edges(id.as_ref(), |node| node.out_edges())
    }

    /// Edges entering the node: ()-->(n)
    pub fn incoming_edges(&self, id: impl AsRef<str>) -> GraphResult<Vec<Edge>> {
        self.incident_edges(id.as_ref(), |node| node.in_edges())
    }

    fn incident_edges(
        &self,
        id: &str,
        select: impl Fn(&Node) -> &HashSet<EdgeId>,
    ) -> GraphResult<Vec<Edge>> {
        let tables = self.read();
        let node = tables
            .nodes
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound(NodeId::new(id)))?;

        let mut edges: Vec<Edge> = select(node)
            .iter()
            .filter_map(|edge_id| tables.edges.get(edge_id).cloned())
            .collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(edges)
    }

    /// Counters for diagnostics; O(1) in the size of the graph
    pub fn stats(&self) -> GraphStatistics {
        let (node_count, edge_count) = {
            let tables = self.read();
            (tables.nodes.len(), tables.edges.len())
        };

        GraphStatistics {
            start_time: self.start_time,
            uptime_secs: (Utc::now() - self.start_time).num_seconds(),
            node_count,
            edge_count,
            available_parallelism: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
