//! Node assembly: node rows joined with their category's style rule.

use std::collections::HashMap;

use relmap_model::{
    DataGrid, GraphTables, GridEntry, NodeProperties, NodeView, StyleRule, StyleTables, TextFlag,
};

use crate::legend::LegendMode;

/// Clean a display name for the renderer.
///
/// `("` collapses to `(`, any remaining `"` becomes `)`, and only printable
/// ASCII survives (other characters are dropped, not replaced).
pub fn sanitize_name(raw: &str) -> String {
    raw.replace("(\"", "(")
        .replace('"', ")")
        .chars()
        .filter(|c| *c == ' ' || c.is_ascii_graphic())
        .collect()
}

/// Blank or missing grid cells render as a single space.
fn grid_cell(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => " ".to_string(),
    }
}

fn data_grid(grid: &[GridEntry]) -> DataGrid {
    let title = |i: usize| grid_cell(grid.get(i).and_then(|g| g.title.as_deref()));
    let info = |i: usize| grid_cell(grid.get(i).and_then(|g| g.info.as_deref()));
    DataGrid {
        data_grid_title1: title(0),
        data_grid_info1: info(0),
        data_grid_title2: title(1),
        data_grid_info2: info(1),
        data_grid_title3: title(2),
        data_grid_info3: info(2),
        data_grid_title4: title(3),
        data_grid_info4: info(3),
        data_grid_title5: title(4),
        data_grid_info5: info(4),
        data_grid_properties: " ".to_string(),
    }
}

/// First style row per category.
pub(crate) fn style_index(style: &StyleTables) -> HashMap<&str, &StyleRule> {
    let mut index = HashMap::with_capacity(style.node_styles.len());
    for rule in &style.node_styles {
        index.entry(rule.category.as_str()).or_insert(rule);
    }
    index
}

/// One `NodeView` per node whose subtype has a style rule, in Node-sheet order.
///
/// Nodes without a matching rule are dropped (inner join); the integrity pass
/// normally guarantees there are none.
pub fn assemble_nodes(graph: &GraphTables, style: &StyleTables, mode: &LegendMode) -> Vec<NodeView> {
    let styles = style_index(style);
    let mut out = Vec::with_capacity(graph.nodes.len());

    for node in &graph.nodes {
        let Some(rule) = styles.get(node.subtype.as_str()) else {
            tracing::warn!(node_id = node.id, subtype = %node.subtype, "node has no style rule; dropped");
            continue;
        };

        let node_image = match mode {
            LegendMode::StyleTable => rule.image.clone(),
            LegendMode::Interactive(choices) => match choices.url_for(&node.subtype) {
                Some(url) => url.to_string(),
                None => {
                    tracing::warn!(subtype = %node.subtype, "no icon chosen; using style image");
                    rule.image.clone()
                }
            },
        };

        out.push(NodeView {
            name: sanitize_name(&node.name),
            subtype: node.subtype.clone(),
            uid: node.id,
            data_grid_properties: data_grid(&node.grid),
            node_properties: NodeProperties {
                node_size: rule.size,
                node_shape: rule.shape.clone(),
                node_shadow: TextFlag::from(rule.shadow != 0),
                node_label_font_size: rule.label_font.size,
                node_label_font_color: rule.label_font.color.clone(),
                node_label_font_background: rule.label_font.background.clone(),
                node_label_font_alignment: rule.label_font.alignment.clone(),
                node_image,
                node_color: rule.color.clone(),
            },
        });
    }

    tracing::debug!(nodes = out.len(), "assembled nodes");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{graph, node, style};
    use relmap_model::{IconChoices, IconOption};

    #[test]
    fn sanitize_strips_quote_artifact_and_non_ascii() {
        assert_eq!(sanitize_name("Béta Ltd (\"BL\""), "Bta Ltd (BL)");
        assert_eq!(sanitize_name("Plain Name"), "Plain Name");
        assert_eq!(sanitize_name("Tab\there"), "Tabhere");
        assert_eq!(sanitize_name("日本 Corp"), " Corp");
    }

    #[test]
    fn blank_grid_fields_become_single_space() {
        let mut n = node(1, "Individual");
        n.grid[0].title = Some("Role".to_string());
        n.grid[0].info = Some("   ".to_string());
        let nodes = assemble_nodes(&graph(vec![n], vec![]), &style(), &LegendMode::StyleTable);
        let grid = &nodes[0].data_grid_properties;
        assert_eq!(grid.data_grid_title1, "Role");
        assert_eq!(grid.data_grid_info1, " ");
        assert_eq!(grid.data_grid_title5, " ");
        assert_eq!(grid.data_grid_properties, " ");
    }

    #[test]
    fn style_fields_are_copied_and_shadow_rendered_as_text() {
        let nodes = assemble_nodes(
            &graph(vec![node(1, "Target Entity"), node(2, "Individual")], vec![]),
            &style(),
            &LegendMode::StyleTable,
        );
        assert_eq!(nodes[0].node_properties.node_shadow, TextFlag::True);
        assert_eq!(nodes[0].node_properties.node_size, 40);
        assert_eq!(nodes[0].node_properties.node_image, "https://cdn.example.com/target.png");
        assert_eq!(nodes[1].node_properties.node_shadow, TextFlag::False);
        assert_eq!(nodes[1].node_properties.node_label_font_size, 12);
    }

    #[test]
    fn interactive_mode_resolves_icon_through_choice() {
        let choices = IconChoices::new()
            .with("Target Entity", IconOption::VioletHexagon)
            .with("Individual", IconOption::WhiteHexagon);
        let nodes = assemble_nodes(
            &graph(vec![node(1, "Target Entity"), node(2, "Individual")], vec![]),
            &style(),
            &LegendMode::Interactive(choices),
        );
        assert_eq!(nodes[0].node_properties.node_image, IconOption::VioletHexagon.url());
        assert_eq!(nodes[1].node_properties.node_image, IconOption::WhiteHexagon.url());
    }

    #[test]
    fn node_without_style_rule_is_dropped() {
        let nodes = assemble_nodes(
            &graph(vec![node(1, "Individual"), node(2, "Unstyled")], vec![]),
            &style(),
            &LegendMode::StyleTable,
        );
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].uid, 1);
    }
}
