//! Export, ingest and on-disk snapshots
//!
//! A `GraphDump` is the ordered node list plus ordered edge list that fully
//! describes a store. Ingest replays `add_node` for every node and then
//! `add_edge` for every edge, so malformed input fails with the same errors as
//! direct calls. Adjacency lists carried by node records are informational and
//! are recomputed on ingest.
//!
//! Snapshot files are a gzip-compressed bincode encoding of the dump.

use super::edge::Edge;
use super::node::Node;
use super::property::PropertyMap;
use super::store::{GraphError, GraphResult, GraphStore};
use super::types::{EdgeId, Label, NodeId};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Snapshot errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    /// The dump decoded but could not be replayed
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Exported form of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub uid: NodeId,
    pub label: Label,
    #[serde(default)]
    pub properties: PropertyMap,
    #[serde(default)]
    pub in_edges: Vec<EdgeId>,
    #[serde(default)]
    pub out_edges: Vec<EdgeId>,
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        let mut in_edges: Vec<EdgeId> = node.in_edges().iter().cloned().collect();
        let mut out_edges: Vec<EdgeId> = node.out_edges().iter().cloned().collect();
        in_edges.sort();
        out_edges.sort();

        NodeRecord {
            uid: node.id,
            label: node.label,
            properties: node.properties,
            in_edges,
            out_edges,
        }
    }
}

/// Edges are exported as-is; `Edge` already carries the record field names.
pub type EdgeRecord = Edge;

/// Full export of a store, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDump {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl GraphStore {
    /// Export every node and edge under one consistent read
    pub fn dump(&self) -> GraphDump {
        let tables = self.read();
        GraphDump {
            nodes: tables.nodes.values().cloned().map(NodeRecord::from).collect(),
            edges: tables.edges.values().cloned().collect(),
        }
    }

    /// Replay a dump into this store: all nodes first, then all edges.
    /// Stops at the first failing record; records before it stay applied.
    pub fn ingest(&self, dump: GraphDump) -> GraphResult<()> {
        let (node_total, edge_total) = (dump.nodes.len(), dump.edges.len());

        for record in dump.nodes {
            self.add_node(record.uid, record.label, record.properties)?;
        }
        for record in dump.edges {
            self.add_edge(
                record.id,
                record.source,
                record.label,
                record.target,
                record.properties,
            )?;
        }

        debug!(nodes = node_total, edges = edge_total, "dump ingested");
        Ok(())
    }

    /// Build a new store from a dump
    pub fn from_dump(dump: GraphDump) -> GraphResult<GraphStore> {
        let store = GraphStore::new();
        store.ingest(dump)?;
        Ok(store)
    }

    /// Export as pretty-printed JSON
    pub fn to_json(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string_pretty(&self.dump())?)
    }

    /// Build a new store from a JSON export
    pub fn from_json(json: &str) -> SnapshotResult<GraphStore> {
        let dump: GraphDump = serde_json::from_str(json)?;
        Ok(GraphStore::from_dump(dump)?)
    }

    /// Write a compressed binary snapshot to `path`, replacing any existing file
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> SnapshotResult<()> {
        let path = path.as_ref();
        let dump = self.dump();

        let file = File::create(path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        bincode::serialize_into(&mut encoder, &dump)?;
        encoder.finish()?.flush()?;

        info!(
            path = %path.display(),
            nodes = dump.nodes.len(),
            edges = dump.edges.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// Load a snapshot written by `save_snapshot` into a new store
    pub fn load_snapshot(path: impl AsRef<Path>) -> SnapshotResult<GraphStore> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let decoder = GzDecoder::new(BufReader::new(file));
        let dump: GraphDump = bincode::deserialize_from(decoder)?;
        let store = GraphStore::from_dump(dump)?;

        info!(
            path = %path.display(),
            nodes = store.node_count(),
            edges = store.edge_count(),
            "snapshot loaded"
        );
        Ok(store)
    }
}
