//! Small table builders shared by the unit tests.

use std::collections::BTreeMap;

use relmap_model::{
    BrandingConfig, ConnectionRecord, EdgeStyleRule, GraphTables, LabelFont, NodeRecord,
    StyleRule, StyleTables,
};

pub(crate) fn node(id: i64, subtype: &str) -> NodeRecord {
    NodeRecord {
        id,
        name: format!("Node {id}"),
        node_type: if subtype == "Individual" { "Person" } else { "Company" }.to_string(),
        relationship: None,
        subtype: subtype.to_string(),
        grid: Default::default(),
    }
}

pub(crate) fn connection(from: i64, to: Option<i64>, level: &str) -> ConnectionRecord {
    ConnectionRecord {
        uid: None,
        from,
        to,
        level: level.to_string(),
    }
}

pub(crate) fn graph(nodes: Vec<NodeRecord>, connections: Vec<ConnectionRecord>) -> GraphTables {
    GraphTables { nodes, connections }
}

fn rule(category: &str, image: &str, size: i64, shadow: i64, font_size: i64) -> StyleRule {
    StyleRule {
        category: category.to_string(),
        image: image.to_string(),
        color: "#2b6cb0".to_string(),
        label_font: LabelFont {
            alignment: "center".to_string(),
            color: "#ffffff".to_string(),
            background: "#000000".to_string(),
            size: font_size,
        },
        shape: "image".to_string(),
        size,
        shadow,
    }
}

fn edge(level: &str, width: i64, dashes: i64, connection_type: Option<&str>) -> EdgeStyleRule {
    EdgeStyleRule {
        level: level.to_string(),
        width,
        color: "#888888".to_string(),
        length: 200,
        dashes,
        connection_type: connection_type.map(str::to_string),
    }
}

pub(crate) fn style() -> StyleTables {
    StyleTables {
        node_styles: vec![
            rule("Target Entity", "https://cdn.example.com/target.png", 40, 1, 14),
            rule("Individual", "https://cdn.example.com/person.png", 25, 0, 12),
            rule("Organisation", "https://cdn.example.com/org.png", 30, 0, 12),
        ],
        edge_styles: vec![
            edge("Officer", 2, 1, None),
            edge("Ownership", 3, 0, Some("arrow")),
        ],
        branding: BrandingConfig {
            client_name: "Acme Compliance".to_string(),
            logo_url: "https://cdn.example.com/logo.png".to_string(),
            sidebar_short_logo: "https://cdn.example.com/short.png".to_string(),
            background_mode: serde_json::json!({"mode": "light"}),
            legend_captions: BTreeMap::new(),
        },
    }
}
