//! Node implementation for the property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, Label, NodeId};
use std::collections::HashSet;

/// A node in the property graph
///
/// Nodes have:
/// - A caller-assigned unique ID
/// - Exactly one label
/// - Properties (key-value pairs)
/// - Inbound and outbound adjacency sets, owned and maintained by the store
///
/// The adjacency sets are back-references into the store's edge table. A node
/// built outside a store always starts with both sets empty, and the store never
/// trusts the sets of a node handed to it by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// The node's single label
    pub label: Label,

    /// Properties associated with this node
    pub properties: PropertyMap,

    /// Edges whose target is this node: ()-->(n)
    in_edges: HashSet<EdgeId>,

    /// Edges whose source is this node: (n)-->()
    out_edges: HashSet<EdgeId>,
}

impl Node {
    /// Create a node with no properties
    pub fn new(id: impl Into<NodeId>, label: impl Into<Label>) -> Self {
        Self::new_with_properties(id, label, PropertyMap::new())
    }

    /// Create a node with properties
    pub fn new_with_properties(
        id: impl Into<NodeId>,
        label: impl Into<Label>,
        properties: PropertyMap,
    ) -> Self {
        Node {
            id: id.into(),
            label: label.into(),
            properties,
            in_edges: HashSet::new(),
            out_edges: HashSet::new(),
        }
    }

    /// Check if the node carries a specific label
    pub fn has_label(&self, label: &Label) -> bool {
        &self.label == label
    }

    /// Set a property value
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Remove a property
    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Inbound edge UIDs: ()-->(n)
    pub fn in_edges(&self) -> &HashSet<EdgeId> {
        &self.in_edges
    }

    /// Outbound edge UIDs: (n)-->()
    pub fn out_edges(&self) -> &HashSet<EdgeId> {
        &self.out_edges
    }

    /// All incident edge UIDs, inbound first: ()-->(n)-->()
    pub fn edges(&self) -> Vec<&EdgeId> {
        self.in_edges.iter().chain(self.out_edges.iter()).collect()
    }

    /// Number of attached edges in both directions
    pub fn edge_count(&self) -> usize {
        self.in_edges.len() + self.out_edges.len()
    }

    pub(crate) fn attach_inbound(&mut self, edge: EdgeId) {
        self.in_edges.insert(edge);
    }

    pub(crate) fn attach_outbound(&mut self, edge: EdgeId) {
        self.out_edges.insert(edge);
    }

    pub(crate) fn detach_inbound(&mut self, edge: &EdgeId) {
        self.in_edges.remove(edge);
    }

    pub(crate) fn detach_outbound(&mut self, edge: &EdgeId) {
        self.out_edges.remove(edge);
    }

    /// Move the store-tracked adjacency of `previous` onto this node
    pub(crate) fn adopt_adjacency(&mut self, previous: Node) {
        self.in_edges = previous.in_edges;
        self.out_edges = previous.out_edges;
    }

    /// Drop any adjacency state, used before handing a caller value to the store
    pub(crate) fn clear_adjacency(&mut self) {
        self.in_edges.clear();
        self.out_edges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_node() {
        let node = Node::new("node-foo", "person");
        assert_eq!(node.id, NodeId::new("node-foo"));
        assert!(node.has_label(&Label::new("person")));
        assert!(!node.has_label(&Label::new("animal")));
        assert_eq!(node.edge_count(), 0);
    }

    #[test]
    fn test_node_properties() {
        let mut node = Node::new("node-foo", "person");

        node.set_property("name", "foo");
        node.set_property("age", 30i64);
        node.set_property("active", true);

        assert_eq!(node.get_property("name").unwrap().as_str(), Some("foo"));
        assert_eq!(node.get_property("age").unwrap().as_integer(), Some(30));
        assert_eq!(node.get_property("active").unwrap().as_boolean(), Some(true));
        assert_eq!(node.property_count(), 3);

        let removed = node.remove_property("age");
        assert!(removed.is_some());
        assert_eq!(node.property_count(), 2);
        assert!(!node.has_property("age"));
    }

    #[test]
    fn test_adjacency_bookkeeping() {
        let mut node = Node::new("node-foo", "person");
        node.attach_outbound(EdgeId::new("edge-knows"));
        node.attach_outbound(EdgeId::new("edge-owns"));
        node.attach_inbound(EdgeId::new("edge-likes"));

        assert_eq!(node.out_edges().len(), 2);
        assert_eq!(node.in_edges().len(), 1);
        assert_eq!(node.edge_count(), 3);
        assert_eq!(node.edges()[0], &EdgeId::new("edge-likes"));

        node.detach_outbound(&EdgeId::new("edge-owns"));
        assert!(!node.out_edges().contains(&EdgeId::new("edge-owns")));

        let mut replacement = Node::new("node-foo", "person");
        replacement.adopt_adjacency(node);
        assert_eq!(replacement.edge_count(), 2);

        replacement.clear_adjacency();
        assert_eq!(replacement.edge_count(), 0);
    }
}
