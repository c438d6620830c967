//! Cypher query parser using Pest
//!
//! Parses the `MATCH (n:Label {key: value}) ... RETURN n, ...` subset into a
//! [`QueryPlan`]. Property literals are normalised to the same bytes the
//! `PropertyValue` constructors produce, so a literal in a query compares equal
//! to the value stored through the API.

use crate::graph::{Label, PropertyMap, PropertyValue};
use crate::query::ast::*;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "query/cypher.pest"]
struct CypherParser;

/// Parser errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// Text does not match the grammar
    #[error("Parse error: {0}")]
    PestError(#[from] pest::error::Error<Rule>),

    #[error("Duplicate property key: {0}")]
    DuplicatePropertyKey(String),

    /// A node pattern names more than one label
    #[error("Multiple labels not supported: {0}")]
    MultipleLabels(String),

    #[error("Query has no RETURN clause")]
    MissingReturn,

    /// A RETURN variable is not bound by any MATCH
    #[error("Unbound variable in RETURN: {0}")]
    UnboundVariable(String),

    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a Cypher query string into a query plan
pub fn parse_query(input: &str) -> ParseResult<QueryPlan> {
    let pairs = CypherParser::parse(Rule::query, input)?;

    let mut plan = QueryPlan::new();

    for pair in pairs {
        if pair.as_rule() != Rule::query {
            continue;
        }
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::statement => plan.reading_clauses.push(parse_statement(inner)?),
                Rule::EOI => break,
                _ => {}
            }
        }
    }

    Ok(plan)
}

fn parse_statement(pair: Pair<Rule>) -> ParseResult<ReadingClause> {
    let mut matches = Vec::new();
    let mut returns = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::match_clause => matches.push(parse_match_clause(inner)?),
            Rule::return_clause => returns = Some(parse_return_clause(inner)),
            _ => {}
        }
    }

    let clause = ReadingClause {
        matches,
        returns: returns.ok_or(ParseError::MissingReturn)?,
    };

    let unbound = {
        let bound = clause.bound_variables();
        clause
            .returns
            .iter()
            .find(|v| !bound.contains(v.as_str()))
            .cloned()
    };
    if let Some(name) = unbound {
        return Err(ParseError::UnboundVariable(name));
    }

    Ok(clause)
}

fn parse_match_clause(pair: Pair<Rule>) -> ParseResult<Match> {
    let mut nodes = Vec::new();

    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::node_pattern {
            nodes.push(parse_node_pattern(inner)?);
        }
    }

    Ok(Match { nodes })
}

fn parse_return_clause(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner()
        .filter(|inner| inner.as_rule() == Rule::variable)
        .map(|inner| inner.as_str().to_string())
        .collect()
}

fn parse_node_pattern(pair: Pair<Rule>) -> ParseResult<NodePattern> {
    let text = pair.as_str().to_string();
    let mut variable = String::new();
    let mut labels: Vec<Label> = Vec::new();
    let mut properties = PropertyMap::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::variable => variable = inner.as_str().to_string(),
            Rule::label => {
                if let Some(name) = inner.into_inner().next() {
                    labels.push(Label::new(name.as_str()));
                }
            }
            Rule::property_map => properties = parse_property_map(inner)?,
            _ => {}
        }
    }

    if labels.len() > 1 {
        return Err(ParseError::MultipleLabels(text));
    }

    Ok(NodePattern {
        variable,
        label: labels.pop(),
        properties,
    })
}

fn parse_property_map(pair: Pair<Rule>) -> ParseResult<PropertyMap> {
    let mut props = PropertyMap::new();

    for prop in pair.into_inner() {
        if prop.as_rule() != Rule::property {
            continue;
        }

        let mut key = String::new();
        let mut value = PropertyValue::default();

        for part in prop.into_inner() {
            match part.as_rule() {
                Rule::property_key => key = part.as_str().to_string(),
                Rule::value => value = parse_value(part)?,
                _ => {}
            }
        }

        if props.contains_key(&key) {
            return Err(ParseError::DuplicatePropertyKey(key));
        }
        props.insert(key, value);
    }

    Ok(props)
}

fn parse_value(pair: Pair<Rule>) -> ParseResult<PropertyValue> {
    let text = pair.as_str();
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| ParseError::InvalidLiteral(text.to_string()))?;

    match inner.as_rule() {
        Rule::boolean => Ok(PropertyValue::from(inner.as_str().eq_ignore_ascii_case("true"))),
        Rule::integer => {
            let val: i64 = inner
                .as_str()
                .parse()
                .map_err(|_| ParseError::InvalidLiteral(inner.as_str().to_string()))?;
            Ok(PropertyValue::from(val))
        }
        Rule::string => {
            // Quotes are matched by the grammar; the body is the only inner pair.
            let body = inner.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            Ok(PropertyValue::from(unescape(body)?))
        }
        _ => Err(ParseError::InvalidLiteral(inner.as_str().to_string())),
    }
}

/// Resolve backslash escapes in a quoted string body
pub(crate) fn unescape(body: &str) -> ParseResult<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let escaped = match chars.next() {
            Some('"') => '"',
            Some('\'') => '\'',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{0008}',
            Some('f') => '\u{000C}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| ParseError::InvalidLiteral(format!("\\u{}", hex)))?
            }
            other => {
                let seq = other.map(|c| format!("\\{}", c)).unwrap_or_else(|| "\\".to_string());
                return Err(ParseError::InvalidLiteral(seq));
            }
        };
        out.push(escaped);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_clause(query: &str) -> ReadingClause {
        let mut plan = parse_query(query).unwrap();
        assert_eq!(plan.reading_clauses.len(), 1);
        plan.reading_clauses.remove(0)
    }

    #[test]
    fn test_single_match_no_conditions() {
        let clause = single_clause("MATCH (n) RETURN n");
        assert_eq!(clause.returns, vec!["n"]);
        assert_eq!(
            clause.matches,
            vec![Match {
                nodes: vec![NodePattern::new("n")]
            }]
        );
    }

    #[test]
    fn test_single_label_multiline() {
        let clause = single_clause("\n\t\tMATCH (n:Person)\r\n\t\tRETURN n\n");
        assert_eq!(
            clause.matches[0].nodes[0],
            NodePattern::new("n").with_label("Person")
        );
    }

    #[test]
    fn test_multiple_matches() {
        let clause = single_clause("MATCH (n:Person)\nMATCH (m:Animal)\nRETURN n, m");
        assert_eq!(clause.returns, vec!["n", "m"]);
        assert_eq!(clause.matches.len(), 2);
        assert_eq!(clause.matches[1].nodes[0], NodePattern::new("m").with_label("Animal"));
    }

    #[test]
    fn test_comma_separated_patterns() {
        let clause = single_clause("MATCH (n:Person), (m:Animal) RETURN m");
        assert_eq!(clause.matches.len(), 1);
        assert_eq!(clause.matches[0].nodes.len(), 2);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let clause = single_clause("match (n:person {active: TRUE}) return n");
        let node = &clause.matches[0].nodes[0];
        assert_eq!(node.label, Some(Label::new("person")));
        assert_eq!(node.properties["active"].as_bytes(), b"true");
    }

    #[test]
    fn test_property_normalisation() {
        let clause = single_clause(
            r#"MATCH (n:Person {name: "Foo", surname: 'Bar', age: 21, active: true, address: "My address is private"}) RETURN n"#,
        );
        let expected = NodePattern::new("n")
            .with_label("Person")
            .with_property("name", "Foo")
            .with_property("surname", "Bar")
            .with_property("age", "21")
            .with_property("active", "true")
            .with_property("address", "My address is private");
        assert_eq!(clause.matches[0].nodes[0], expected);
    }

    #[test]
    fn test_integer_is_rendered_base_10() {
        let clause = single_clause("MATCH (n {age: 007}) RETURN n");
        assert_eq!(clause.matches[0].nodes[0].properties["age"].as_bytes(), b"7");
    }

    #[test]
    fn test_integer_overflow() {
        let result = parse_query("MATCH (n {big: 99999999999999999999}) RETURN n");
        assert!(matches!(result, Err(ParseError::InvalidLiteral(_))));
    }

    #[test]
    fn test_string_escapes() {
        let clause = single_clause(r#"MATCH (n {q: "say \"hi\"\n", s: 'it\'s', u: "café"}) RETURN n"#);
        let props = &clause.matches[0].nodes[0].properties;
        assert_eq!(props["q"].as_str(), Some("say \"hi\"\n"));
        assert_eq!(props["s"].as_str(), Some("it's"));
        assert_eq!(props["u"].as_str(), Some("café"));
    }

    #[test]
    fn test_empty_property_map_and_string() {
        let clause = single_clause(r#"MATCH (n {}) MATCH (m {name: ""}) RETURN n, m"#);
        assert!(clause.matches[0].nodes[0].properties.is_empty());
        assert!(clause.matches[1].nodes[0].properties["name"].is_empty());
    }

    #[test]
    fn test_unbound_return_variable() {
        let result = parse_query("MATCH (n:Person)\nMATCH (m:Animal)\nRETURN n, missing");
        match result {
            Err(ParseError::UnboundVariable(name)) => assert_eq!(name, "missing"),
            other => panic!("expected unbound variable error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_return() {
        assert!(matches!(
            parse_query("MATCH (n:Person)"),
            Err(ParseError::MissingReturn)
        ));
    }

    #[test]
    fn test_multiple_labels() {
        assert!(matches!(
            parse_query("MATCH (n:Person:Multiple:Not:Supported) RETURN n"),
            Err(ParseError::MultipleLabels(_))
        ));
    }

    #[test]
    fn test_duplicate_property_key() {
        match parse_query(r#"MATCH (n:Person {name: "Foo", name: 'Bar'}) RETURN n"#) {
            Err(ParseError::DuplicatePropertyKey(key)) => assert_eq!(key, "name"),
            other => panic!("expected duplicate key error, got {:?}", other),
        }
    }

    #[test]
    fn test_grammar_violations() {
        for query in [
            "",
            "RETURN n",
            "MATCH n RETURN n",
            "MATCH () RETURN n",
            "MATCH (n) RETURN",
            "MATCH (n {name: foo}) RETURN n",
            "MATCH (n {age: 21x}) RETURN n",
            "MATCH (n) RETURN n extra",
            "MATCH (n)-[:knows]->(m) RETURN n",
        ] {
            assert!(
                matches!(parse_query(query), Err(ParseError::PestError(_))),
                "expected grammar error for {:?}",
                query
            );
        }
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\tb\\c\/d").unwrap(), "a\tb\\c/d");
        assert_eq!(unescape(r"\b\f\r").unwrap(), "\u{0008}\u{000C}\r");
        assert!(unescape(r"\ud800").is_err());
        assert!(unescape(r"\q").is_err());
    }
}
