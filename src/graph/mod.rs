//! Core graph database implementation
//!
//! This module implements the property graph data model with:
//! - Nodes with exactly one label and byte-string properties
//! - Directed, labelled edges with properties
//! - Multiple edges between the same nodes
//! - In-memory storage guarded by a single reader/writer lock
//! - Snapshot cursors, neighbourhood extraction and dump/restore

pub mod cursor;
pub mod edge;
pub mod node;
pub mod property;
pub mod snapshot;
pub mod store;
pub mod subgraph;
pub mod types;

// Re-export main types
pub use cursor::Cursor;
pub use edge::Edge;
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use snapshot::{GraphDump, NodeRecord, SnapshotError, SnapshotResult};
pub use store::{GraphError, GraphResult, GraphStatistics, GraphStore, UNLIMITED};
pub use types::{EdgeId, Label, NodeId};
