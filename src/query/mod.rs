//! Query processing module
//!
//! Text -> [`parse_query`] -> [`QueryPlan`] -> [`QueryExecutor`] -> result
//! [`GraphStore`]. The supported language is the Cypher subset
//! `MATCH (var:Label {key: value}) ... RETURN var, ...`.

pub mod ast;
pub mod executor;
pub mod parser;

// Re-export main types
pub use ast::{Match, NodePattern, QueryPlan, ReadingClause};
pub use executor::{ExecutionError, ExecutionResult, QueryExecutor};
pub use parser::{parse_query, ParseError, ParseResult};

use crate::config::DraftConfig;
use crate::graph::GraphStore;
use thiserror::Error;
use tracing::debug;

/// Any failure between query text and result store
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Query engine - high-level interface for executing queries
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    /// Copy edges between matched nodes into results
    pub project_edges: bool,
}

impl QueryEngine {
    /// Create a query engine producing nodes-only results
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &DraftConfig) -> Self {
        Self {
            project_edges: config.project_query_edges,
        }
    }

    /// Parse and execute a query against `store`
    pub fn execute(&self, query_str: &str, store: &GraphStore) -> QueryResult<GraphStore> {
        let plan = parse_query(query_str)?;
        debug!(clauses = plan.reading_clauses.len(), "query parsed");

        let executor = QueryExecutor::new(store).with_edge_projection(self.project_edges);
        Ok(executor.execute(&plan)?)
    }
}

impl GraphStore {
    /// Run a query with the default engine and return the result subgraph
    pub fn query(&self, query_str: &str) -> QueryResult<GraphStore> {
        QueryEngine::new().execute(query_str, self)
    }
}
