//! Query plan produced by the parser
//!
//! The plan mirrors the query text: one reading clause per statement holding
//! every MATCH in order, plus the RETURN variables.

use crate::graph::{Label, PropertyMap};
use std::collections::HashSet;

/// Parsed query, ready for execution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPlan {
    pub reading_clauses: Vec<ReadingClause>,
}

impl QueryPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// All node patterns across every clause, in query order
    pub fn node_patterns(&self) -> impl Iterator<Item = &NodePattern> {
        self.reading_clauses
            .iter()
            .flat_map(|clause| clause.matches.iter())
            .flat_map(|m| m.nodes.iter())
    }
}

/// A run of MATCH clauses and the variables they return
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingClause {
    pub matches: Vec<Match>,
    pub returns: Vec<String>,
}

impl ReadingClause {
    /// Variables bound by any MATCH in this clause
    pub fn bound_variables(&self) -> HashSet<&str> {
        self.matches
            .iter()
            .flat_map(|m| m.nodes.iter())
            .map(|node| node.variable.as_str())
            .collect()
    }
}

/// MATCH clause: one or more comma-separated node patterns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Match {
    pub nodes: Vec<NodePattern>,
}

/// Node pattern: (n:Label {key: value})
#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
    pub variable: String,
    /// `None` matches any label
    pub label: Option<Label>,
    /// Exact-match property filter; empty matches any properties
    pub properties: PropertyMap,
}

impl NodePattern {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            label: None,
            properties: PropertyMap::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<Label>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<crate::graph::PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Label filter for `GraphStore::nodes_by`
    pub fn label_filter(&self) -> HashSet<Label> {
        self.label.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_pattern_builder() {
        let pattern = NodePattern::new("n").with_label("person").with_property("age", 21i64);
        assert_eq!(pattern.variable, "n");
        assert_eq!(pattern.label_filter(), HashSet::from([Label::new("person")]));
        assert_eq!(pattern.properties["age"].as_str(), Some("21"));

        assert!(NodePattern::new("m").label_filter().is_empty());
    }

    #[test]
    fn test_bound_variables() {
        let clause = ReadingClause {
            matches: vec![
                Match {
                    nodes: vec![NodePattern::new("n"), NodePattern::new("m")],
                },
                Match {
                    nodes: vec![NodePattern::new("o")],
                },
            ],
            returns: vec!["n".to_string()],
        };

        assert_eq!(clause.bound_variables(), HashSet::from(["n", "m", "o"]));

        let plan = QueryPlan {
            reading_clauses: vec![clause],
        };
        assert_eq!(plan.node_patterns().count(), 3);
    }
}
