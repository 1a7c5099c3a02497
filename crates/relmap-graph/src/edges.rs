//! Edge assembly.
//!
//! Connections are kept only when both endpoints name a node in the Node
//! sheet; a missing `to` never resolves. Survivors are joined with their
//! level's edge style, sorted by `from` (stable, so ties keep sheet order) and
//! renumbered 1..=n. The number is positional: it does not carry the
//! connection's `UId` and changes if the sheet is reordered.

use std::collections::{HashMap, HashSet};

use relmap_model::{EdgeStyleRule, EdgeView, GraphTables, StyleTables, TextFlag};

pub fn assemble_edges(graph: &GraphTables, style: &StyleTables) -> Vec<EdgeView> {
    let node_ids: HashSet<i64> = graph.nodes.iter().map(|n| n.id).collect();

    let mut levels: HashMap<&str, &EdgeStyleRule> = HashMap::with_capacity(style.edge_styles.len());
    for rule in &style.edge_styles {
        levels.entry(rule.level.as_str()).or_insert(rule);
    }

    let mut out: Vec<EdgeView> = Vec::with_capacity(graph.connections.len());
    for connection in &graph.connections {
        if !node_ids.contains(&connection.from) {
            continue;
        }
        let Some(to) = connection.to.filter(|to| node_ids.contains(to)) else {
            continue;
        };
        let Some(rule) = levels.get(connection.level.as_str()) else {
            tracing::warn!(level = %connection.level, "connection level has no edge style; dropped");
            continue;
        };
        out.push(EdgeView {
            from: connection.from,
            to,
            edge_width: rule.width,
            edge_color: rule.color.clone(),
            edge_length: rule.length,
            edge_dashes: TextFlag::from(rule.dashes != 0),
            connection_type: rule.connection_type.clone(),
            uid: 0,
        });
    }

    out.sort_by_key(|edge| edge.from);
    for (uid, edge) in (1u64..).zip(out.iter_mut()) {
        edge.uid = uid;
    }

    tracing::debug!(
        edges = out.len(),
        dropped = graph.connections.len() - out.len(),
        "assembled edges"
    );
    out
}
