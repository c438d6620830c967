//! Draft Graph Database
//!
//! An embeddable, in-memory property graph with a small Cypher query front end.
//!
//! - Nodes carry a caller-assigned UID, exactly one label and byte-string
//!   properties; edges are directed, labelled and carry properties.
//! - One [`GraphStore`] is safe to share between threads; reads run in parallel,
//!   writes are serialised.
//! - Queries of the form `MATCH (n:Label {key: value}) RETURN n` return an
//!   independent result store.
//! - A store can be exported to and rebuilt from a [`GraphDump`], as JSON or as
//!   a compressed binary snapshot.
//!
//! ## Example Usage
//!
//! ```rust
//! use draft::graph::{GraphStore, PropertyMap, PropertyValue};
//!
//! let store = GraphStore::new();
//!
//! let mut props = PropertyMap::new();
//! props.insert("name".to_string(), PropertyValue::from("foo"));
//! store.add_node("node-foo", "person", props).unwrap();
//! store.add_node("node-dog", "animal", PropertyMap::new()).unwrap();
//! store.add_edge("edge-owns", "node-foo", "owns", "node-dog", PropertyMap::new()).unwrap();
//!
//! let result = store.query(r#"MATCH (n:person {name: "foo"}) RETURN n"#).unwrap();
//! assert_eq!(result.node_count(), 1);
//!
//! let neighbourhood = store.sub_graph("node-dog", 1).unwrap();
//! assert_eq!(neighbourhood.edge_count(), 1);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod query;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, DraftConfig};

pub use graph::{
    Cursor, Edge, EdgeId, GraphDump, GraphError, GraphResult, GraphStatistics, GraphStore, Label,
    Node, NodeId, NodeRecord, PropertyMap, PropertyValue, SnapshotError, SnapshotResult, UNLIMITED,
};

pub use query::{parse_query, QueryEngine, QueryError, QueryPlan, QueryResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
