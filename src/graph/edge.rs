//! Edge implementation for the property graph
//!
//! Edges are directed (source -> target), labelled, and carry properties.
//! Several edges may connect the same pair of nodes.

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, Label, NodeId};
use serde::{Deserialize, Serialize};

/// A directed edge in the property graph
///
/// The serialized field names (`uid`, `source_uid`, `label`, `target_uid`,
/// `properties`) are the ones used by graph dumps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    #[serde(rename = "uid")]
    pub id: EdgeId,

    /// Source node (edge goes FROM this node)
    #[serde(rename = "source_uid")]
    pub source: NodeId,

    /// Relationship label (e.g., "knows", "owns")
    pub label: Label,

    /// Target node (edge goes TO this node)
    #[serde(rename = "target_uid")]
    pub target: NodeId,

    /// Properties associated with this edge
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        label: impl Into<Label>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self::new_with_properties(id, source, label, target, PropertyMap::new())
    }

    /// Create a new edge with properties
    pub fn new_with_properties(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        label: impl Into<Label>,
        target: impl Into<NodeId>,
        properties: PropertyMap,
    ) -> Self {
        Edge {
            id: id.into(),
            source: source.into(),
            label: label.into(),
            target: target.into(),
            properties,
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
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

    /// Check if this edge connects two specific nodes (in either direction)
    pub fn connects(&self, node1: &NodeId, node2: &NodeId) -> bool {
        (&self.source == node1 && &self.target == node2)
            || (&self.source == node2 && &self.target == node1)
    }

    /// Check if this edge goes FROM a specific node
    pub fn starts_from(&self, node: &NodeId) -> bool {
        &self.source == node
    }

    /// Check if this edge goes TO a specific node
    pub fn ends_at(&self, node: &NodeId) -> bool {
        &self.target == node
    }

    /// The endpoint opposite to `node`, if `node` is an endpoint at all
    pub fn other_end(&self, node: &NodeId) -> Option<&NodeId> {
        if &self.source == node {
            Some(&self.target)
        } else if &self.target == node {
            Some(&self.source)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_edge() {
        let edge = Edge::new("edge-knows", "node-foo", "knows", "node-bar");

        assert_eq!(edge.id, EdgeId::new("edge-knows"));
        assert_eq!(edge.source, NodeId::new("node-foo"));
        assert_eq!(edge.target, NodeId::new("node-bar"));
        assert_eq!(edge.label.as_str(), "knows");
    }

    #[test]
    fn test_edge_direction() {
        let foo = NodeId::new("node-foo");
        let dog = NodeId::new("node-dog");
        let edge = Edge::new("edge-owns", &foo, "owns", &dog);

        assert!(edge.starts_from(&foo));
        assert!(edge.ends_at(&dog));
        assert!(!edge.starts_from(&dog));
        assert!(!edge.ends_at(&foo));
        assert!(edge.connects(&dog, &foo));
        assert_eq!(edge.other_end(&foo), Some(&dog));
        assert_eq!(edge.other_end(&NodeId::new("node-bar")), None);
    }

    #[test]
    fn test_edge_properties() {
        let mut edge = Edge::new("edge-knows", "node-foo", "knows", "node-bar");

        edge.set_property("since", 2020i64);
        edge.set_property("verified", true);

        assert_eq!(edge.get_property("since").unwrap().as_integer(), Some(2020));
        assert_eq!(edge.get_property("verified").unwrap().as_boolean(), Some(true));
        assert_eq!(edge.property_count(), 2);

        assert!(edge.remove_property("since").is_some());
        assert!(!edge.has_property("since"));
    }

    #[test]
    fn test_edge_dump_field_names() {
        let edge = Edge::new("edge-knows", "node-foo", "knows", "node-bar");
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["uid"], "edge-knows");
        assert_eq!(json["source_uid"], "node-foo");
        assert_eq!(json["target_uid"], "node-bar");
        assert_eq!(json["label"], "knows");
    }
}
