//! Query execution
//!
//! Every node pattern of every MATCH is evaluated independently with
//! `GraphStore::nodes_by`, and the matched nodes are unioned into a fresh
//! result store. Patterns are not joined: `MATCH (n:a) MATCH (m:b)` returns all
//! `a` nodes plus all `b` nodes.

use crate::graph::{GraphError, GraphStore};
use crate::query::ast::QueryPlan;
use thiserror::Error;
use tracing::debug;

/// Execution errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    /// Graph store error while assembling the result
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Evaluates a query plan against a source store
pub struct QueryExecutor<'a> {
    store: &'a GraphStore,
    project_edges: bool,
}

impl<'a> QueryExecutor<'a> {
    /// Create an executor producing nodes-only results
    pub fn new(store: &'a GraphStore) -> Self {
        Self {
            store,
            project_edges: false,
        }
    }

    /// Also copy every source edge whose endpoints were both matched
    pub fn with_edge_projection(mut self, project_edges: bool) -> Self {
        self.project_edges = project_edges;
        self
    }

    /// Execute a plan and return the result subgraph
    pub fn execute(&self, plan: &QueryPlan) -> ExecutionResult<GraphStore> {
        let result = self.store.empty_like();
        let mut patterns = 0usize;

        for pattern in plan.node_patterns() {
            patterns += 1;
            let matched = self
                .store
                .nodes_by(&pattern.label_filter(), &pattern.properties);

            for node in matched {
                match result.add_node(node.id, node.label, node.properties) {
                    Ok(_) => {}
                    // Matched by an earlier pattern
                    Err(e) if e.is_duplicate() => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        if self.project_edges {
            self.project_edges_into(&result)?;
        }

        debug!(
            patterns,
            nodes = result.node_count(),
            edges = result.edge_count(),
            "query executed"
        );
        Ok(result)
    }

    fn project_edges_into(&self, result: &GraphStore) -> ExecutionResult<()> {
        for edge in self.store.edges() {
            if !(result.has_node(&edge.source) && result.has_node(&edge.target)) {
                continue;
            }
            match result.add_edge(edge.id, edge.source, edge.label, edge.target, edge.properties) {
                Ok(_) => {}
                Err(e) if e.is_duplicate() => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
