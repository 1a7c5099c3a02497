//! Cross-sheet referential and business rules.
//!
//! Runs only on tables that passed the schema pass. Rules are evaluated in a
//! fixed order and the first violation is returned; later rules are not run.
//!
//! 1. every node `SubType` is a style `Component`
//! 2. node ids are pairwise distinct
//! 3. every `from` / non-missing `to` names an existing node
//! 4. every connection `Level` is an edge-style `L2`
//! 5. at most one node has the target category (when enabled)
//! 6. a connection whose `from` is a real node has a `to`

use std::collections::HashSet;

use relmap_model::{ConnectionRecord, GraphTables, StyleTables};
use serde::{Deserialize, Serialize};

use crate::IntegrityError;

/// The distinguished node category of which at most one instance is expected.
pub const TARGET_ENTITY: &str = "Target Entity";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityOptions {
    /// Enforce rule 5.
    pub single_target_entity: bool,
    pub target_category: String,
}

impl Default for IntegrityOptions {
    fn default() -> Self {
        Self {
            single_target_entity: true,
            target_category: TARGET_ENTITY.to_string(),
        }
    }
}

/// Human-readable handle for a connection row in messages.
pub(crate) fn connection_label(index: usize, connection: &ConnectionRecord) -> String {
    match &connection.uid {
        Some(uid) => uid.clone(),
        // Data rows start at spreadsheet row 2.
        None => format!("at row {}", index + 2),
    }
}

pub fn check_integrity(
    graph: &GraphTables,
    style: &StyleTables,
    options: &IntegrityOptions,
) -> Result<(), IntegrityError> {
    // Rule 1
    let categories: HashSet<&str> = style
        .node_styles
        .iter()
        .map(|s| s.category.as_str())
        .collect();
    if let Some(node) = graph
        .nodes
        .iter()
        .find(|n| !categories.contains(n.subtype.as_str()))
    {
        return Err(IntegrityError::UnknownSubtype {
            node_id: node.id,
            subtype: node.subtype.clone(),
        });
    }

    // Rule 2
    let mut node_ids = HashSet::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        if !node_ids.insert(node.id) {
            return Err(IntegrityError::DuplicateNodeId { id: node.id });
        }
    }

    // Rule 3
    for (index, connection) in graph.connections.iter().enumerate() {
        let endpoints = std::iter::once(connection.from).chain(connection.to);
        for id in endpoints {
            if !node_ids.contains(&id) {
                return Err(IntegrityError::DanglingConnection {
                    connection: connection_label(index, connection),
                    id,
                });
            }
        }
    }

    // Rule 4
    let levels: HashSet<&str> = style
        .edge_styles
        .iter()
        .map(|s| s.level.as_str())
        .collect();
    if let Some((index, connection)) = graph
        .connections
        .iter()
        .enumerate()
        .find(|(_, c)| !levels.contains(c.level.as_str()))
    {
        return Err(IntegrityError::UnknownLevel {
            connection: connection_label(index, connection),
            level: connection.level.clone(),
        });
    }

    // Rule 5
    if options.single_target_entity {
        let count = graph
            .nodes
            .iter()
            .filter(|n| n.subtype == options.target_category)
            .count();
        if count > 1 {
            return Err(IntegrityError::MultipleTargetEntities {
                category: options.target_category.clone(),
                count,
            });
        }
    }

    // Rule 6
    if let Some((index, connection)) = graph
        .connections
        .iter()
        .enumerate()
        .find(|(_, c)| node_ids.contains(&c.from) && c.to.is_none())
    {
        return Err(IntegrityError::MissingConnectionTarget {
            connection: connection_label(index, connection),
            from: connection.from,
        });
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        connections = graph.connections.len(),
        single_target_entity = options.single_target_entity,
        "integrity checks passed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{connection, graph, node, style};

    #[test]
    fn valid_tables_pass() {
        let g = graph(
            vec![node(1, "Target Entity"), node(2, "Individual"), node(3, "Organisation")],
            vec![connection(1, Some(2), "Officer"), connection(3, Some(1), "Ownership")],
        );
        assert_eq!(check_integrity(&g, &style(), &IntegrityOptions::default()), Ok(()));
    }

    #[test]
    fn unknown_subtype_fails() {
        let g = graph(vec![node(1, "Individual"), node(2, "Foo")], vec![]);
        assert_eq!(
            check_integrity(&g, &style(), &IntegrityOptions::default()),
            Err(IntegrityError::UnknownSubtype {
                node_id: 2,
                subtype: "Foo".to_string(),
            })
        );
    }

    #[test]
    fn duplicate_node_id_fails() {
        let g = graph(
            vec![node(5, "Individual"), node(6, "Individual"), node(5, "Organisation")],
            vec![],
        );
        assert_eq!(
            check_integrity(&g, &style(), &IntegrityOptions::default()),
            Err(IntegrityError::DuplicateNodeId { id: 5 })
        );
    }

    #[test]
    fn dangling_target_fails() {
        let g = graph(
            vec![node(1, "Individual"), node(2, "Individual"), node(3, "Individual")],
            vec![connection(1, Some(4), "Officer")],
        );
        match check_integrity(&g, &style(), &IntegrityOptions::default()) {
            Err(IntegrityError::DanglingConnection { id, .. }) => assert_eq!(id, 4),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn dangling_source_fails() {
        let g = graph(
            vec![node(1, "Individual")],
            vec![connection(9, Some(1), "Officer")],
        );
        match check_integrity(&g, &style(), &IntegrityOptions::default()) {
            Err(IntegrityError::DanglingConnection { id, .. }) => assert_eq!(id, 9),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unknown_level_fails() {
        let g = graph(
            vec![node(1, "Individual"), node(2, "Individual")],
            vec![connection(1, Some(2), "Cousin")],
        );
        match check_integrity(&g, &style(), &IntegrityOptions::default()) {
            Err(IntegrityError::UnknownLevel { level, .. }) => assert_eq!(level, "Cousin"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn one_target_entity_passes_two_fail() {
        let one = graph(vec![node(1, "Target Entity"), node(2, "Individual")], vec![]);
        assert!(check_integrity(&one, &style(), &IntegrityOptions::default()).is_ok());

        let two = graph(vec![node(1, "Target Entity"), node(2, "Target Entity")], vec![]);
        assert_eq!(
            check_integrity(&two, &style(), &IntegrityOptions::default()),
            Err(IntegrityError::MultipleTargetEntities {
                category: "Target Entity".to_string(),
                count: 2,
            })
        );
    }

    #[test]
    fn target_entity_rule_can_be_disabled() {
        let two = graph(vec![node(1, "Target Entity"), node(2, "Target Entity")], vec![]);
        let options = IntegrityOptions {
            single_target_entity: false,
            ..IntegrityOptions::default()
        };
        assert_eq!(check_integrity(&two, &style(), &options), Ok(()));
    }

    #[test]
    fn blank_target_from_real_node_fails() {
        let g = graph(
            vec![node(1, "Individual"), node(2, "Individual")],
            vec![connection(1, Some(2), "Officer"), connection(1, None, "Officer")],
        );
        assert_eq!(
            check_integrity(&g, &style(), &IntegrityOptions::default()),
            Err(IntegrityError::MissingConnectionTarget {
                connection: "at row 3".to_string(),
                from: 1,
            })
        );
    }

    #[test]
    fn earlier_rule_wins_when_several_fail() {
        // Duplicate id (rule 2) and unknown level (rule 4) and a missing target (rule 6).
        let g = graph(
            vec![node(1, "Individual"), node(1, "Individual")],
            vec![connection(1, None, "Cousin")],
        );
        assert_eq!(
            check_integrity(&g, &style(), &IntegrityOptions::default()),
            Err(IntegrityError::DuplicateNodeId { id: 1 })
        );
    }
}
