use relmap_model::{
    EdgeView, Filters, GraphDocument, GraphTables, GraphView, Legend, NodeView, StyleTables,
    SEARCH_CASE_NAME,
};

/// Merge the assembled parts with branding into one document.
///
/// Trusts its inputs; every check has already run.
pub fn build_document(
    graph: &GraphTables,
    style: &StyleTables,
    legend: Legend,
    nodes: Vec<NodeView>,
    edges: Vec<EdgeView>,
) -> GraphDocument {
    let branding = &style.branding;
    GraphDocument {
        legend,
        client_name: branding.client_name.clone(),
        logo_url: branding.logo_url.clone(),
        sidebar_short_logo: branding.sidebar_short_logo.clone(),
        background_mode: branding.background_mode.clone(),
        search_case_name: SEARCH_CASE_NAME.to_string(),
        filters: Filters {
            node_type: graph
                .distinct_types()
                .into_iter()
                .map(str::to_string)
                .collect(),
        },
        view: GraphView {
            node: nodes,
            node_connections: edges,
        },
    }
}
