//! Neighbourhood extraction
//!
//! `sub_graph` walks the graph breadth-first from a start node, following edges
//! in both directions, and copies what it visits into a new store.

use super::edge::Edge;
use super::node::Node;
use super::store::{GraphError, GraphResult, GraphStore, UNLIMITED};
use super::types::{EdgeId, NodeId};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::debug;

impl GraphStore {
    /// Extract the neighbourhood of `id` as an independent store.
    ///
    /// `levels` bounds the number of hops: 1 is the start node, its direct
    /// neighbours and the edges connecting them; `UNLIMITED` walks the whole
    /// weakly-connected component. An edge is included when it is traversed,
    /// i.e. when at least one endpoint is expanded; edges between two nodes on
    /// the outermost level are not.
    ///
    /// The walk runs against one consistent read of the tables.
    pub fn sub_graph(&self, id: impl AsRef<str>, levels: usize) -> GraphResult<GraphStore> {
        let id = id.as_ref();
        let (nodes, edges) = {
            let tables = self.read();
            let start = tables
                .nodes
                .get(id)
                .ok_or_else(|| GraphError::NodeNotFound(NodeId::new(id)))?;

            let mut visited: FxHashSet<NodeId> = FxHashSet::default();
            let mut traversed: FxHashSet<EdgeId> = FxHashSet::default();
            let mut nodes: Vec<Node> = Vec::new();
            let mut edges: Vec<Edge> = Vec::new();
            let mut queue: VecDeque<(&Node, usize)> = VecDeque::new();

            visited.insert(start.id.clone());
            nodes.push(start.clone());
            queue.push_back((start, 0));

            while let Some((node, depth)) = queue.pop_front() {
                if levels != UNLIMITED && depth >= levels {
                    continue;
                }

                let mut incident: Vec<&EdgeId> = node.edges();
                incident.sort();

                for edge_id in incident {
                    let Some(edge) = tables.edges.get(edge_id) else {
                        continue;
                    };
                    if traversed.insert(edge.id.clone()) {
                        edges.push(edge.clone());
                    }

                    let Some(neighbour_id) = edge.other_end(&node.id) else {
                        continue;
                    };
                    if visited.contains(neighbour_id) {
                        continue;
                    }
                    if let Some(neighbour) = tables.nodes.get(neighbour_id) {
                        visited.insert(neighbour.id.clone());
                        nodes.push(neighbour.clone());
                        queue.push_back((neighbour, depth + 1));
                    }
                }
            }

            (nodes, edges)
        };

        let result = self.empty_like();
        for node in nodes {
            result.add_node(node.id, node.label, node.properties)?;
        }
        for edge in edges {
            result.add_edge(edge.id, edge.source, edge.label, edge.target, edge.properties)?;
        }

        debug!(
            start = id,
            levels,
            nodes = result.node_count(),
            edges = result.edge_count(),
            "sub_graph extracted"
        );
        Ok(result)
    }
}
