use std::path::PathBuf;

use relmap_ingest::{
    load_workbook, validate_workbooks, CellValue, SchemaError, Workbook, WorkbookRole,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

fn fixtures() -> (Workbook, Workbook) {
    let graph = load_workbook(&fixture("graph.json"), WorkbookRole::Graph).expect("graph fixture");
    let style = load_workbook(&fixture("style.json"), WorkbookRole::Style).expect("style fixture");
    (graph, style)
}

fn sheet_mut<'a>(workbook: &'a mut Workbook, name: &str) -> &'a mut relmap_ingest::Sheet {
    workbook
        .sheets
        .iter_mut()
        .find(|s| s.name == name)
        .expect("sheet present in fixture")
}

#[test]
fn fixture_workbooks_validate_into_typed_tables() {
    let (graph, style) = fixtures();
    let validated = validate_workbooks(&graph, &style).expect("fixtures are valid");

    assert_eq!(validated.graph.nodes.len(), 3);
    assert_eq!(validated.graph.connections.len(), 2);
    assert_eq!(validated.style.node_styles.len(), 4);
    assert_eq!(validated.style.edge_styles.len(), 2);

    let jane = &validated.graph.nodes[1];
    assert_eq!(jane.id, 2);
    assert_eq!(jane.grid[1].title.as_deref(), Some("Since"));
    assert_eq!(jane.grid[1].info.as_deref(), Some("2019"));
    assert_eq!(jane.grid[2].title, None);

    let org = validated
        .style
        .node_style("Organisation")
        .expect("Organisation style");
    assert_eq!(org.label_font.size, 12);

    let officer = validated.style.edge_style("Officer").expect("Officer style");
    assert_eq!(officer.dashes, 1);
    assert_eq!(officer.connection_type, None);

    let branding = &validated.style.branding;
    assert_eq!(branding.client_name, "Acme Compliance");
    assert_eq!(branding.background_mode["mode"], "dark");
    assert_eq!(
        branding.legend_captions.get("Target Entity").map(String::as_str),
        Some("Subject of review")
    );
    assert!(!branding.legend_captions.contains_key("Observations"));
}

#[test]
fn missing_sheet_names_sheet_and_workbook() {
    let (mut graph, style) = fixtures();
    graph.sheets.retain(|s| s.name != "Connections");

    let err = validate_workbooks(&graph, &style).unwrap_err();
    assert_eq!(
        err,
        SchemaError::MissingSheet {
            workbook: WorkbookRole::Graph,
            sheet: "Connections".to_string(),
        }
    );
    assert!(err.to_string().contains("graph workbook"));
}

#[test]
fn style_sheet_presence_is_checked_after_graph_sheets() {
    let (mut graph, mut style) = fixtures();
    graph.sheets.retain(|s| s.name != "Node");
    style.sheets.retain(|s| s.name != "Global");

    let err = validate_workbooks(&graph, &style).unwrap_err();
    assert_eq!(
        err,
        SchemaError::MissingSheet {
            workbook: WorkbookRole::Graph,
            sheet: "Node".to_string(),
        }
    );
}

#[test]
fn missing_column_is_reported_before_bad_values_elsewhere() {
    let (mut graph, mut style) = fixtures();
    // A type error in the first sheet...
    sheet_mut(&mut graph, "Node").rows[0][0] = CellValue::from("not-a-number");
    // ...loses to a missing column in the last one.
    let global = sheet_mut(&mut style, "Global");
    global.headers[1] = "logo".to_string();

    let err = validate_workbooks(&graph, &style).unwrap_err();
    assert_eq!(
        err,
        SchemaError::MissingColumn {
            sheet: "Global".to_string(),
            columns: vec!["logo_url".to_string()],
        }
    );
}

#[test]
fn blank_row_in_edge_sheet_fails() {
    let (graph, mut style) = fixtures();
    let edge = sheet_mut(&mut style, "Edge");
    edge.rows.insert(1, vec![CellValue::Empty; 6]);

    let err = validate_workbooks(&graph, &style).unwrap_err();
    assert_eq!(
        err,
        SchemaError::BlankRow {
            sheet: "Edge".to_string(),
            row: 3,
        }
    );
}

#[test]
fn non_integer_node_id_is_a_type_mismatch() {
    let (mut graph, style) = fixtures();
    sheet_mut(&mut graph, "Node").rows[2][0] = CellValue::from("three");

    match validate_workbooks(&graph, &style).unwrap_err() {
        SchemaError::TypeMismatch {
            sheet,
            column,
            row,
            value,
            ..
        } => {
            assert_eq!(sheet, "Node");
            assert_eq!(column, "Node Id");
            assert_eq!(row, 4);
            assert_eq!(value, "three");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn global_sheet_without_rows_is_rejected() {
    let (graph, mut style) = fixtures();
    sheet_mut(&mut style, "Global").rows.clear();

    let err = validate_workbooks(&graph, &style).unwrap_err();
    assert_eq!(
        err,
        SchemaError::EmptySheet {
            sheet: "Global".to_string(),
        }
    );
}

#[test]
fn unreadable_file_is_a_workbook_error() {
    let err = load_workbook(&fixture("does-not-exist.xlsx"), WorkbookRole::Style).unwrap_err();
    assert_eq!(err.code(), "workbook");
    assert!(err.to_string().contains("style workbook"));
}

#[test]
fn blank_style_text_on_unused_category_is_accepted() {
    let (graph, mut style) = fixtures();
    // Observations (row 5) styles no node in the graph.
    sheet_mut(&mut style, "Nodes").rows[3][2] = CellValue::Empty;

    let validated = validate_workbooks(&graph, &style).expect("unused row may be incomplete");
    let observations = validated
        .style
        .node_style("Observations")
        .expect("Observations style");
    assert_eq!(observations.color, "");
}

#[test]
fn blank_style_text_on_joined_category_is_a_type_mismatch() {
    let (graph, mut style) = fixtures();
    sheet_mut(&mut style, "Nodes").rows[1][2] = CellValue::Empty;

    let err = validate_workbooks(&graph, &style).unwrap_err();
    assert_eq!(
        err,
        SchemaError::TypeMismatch {
            sheet: "Nodes".to_string(),
            column: "node_color".to_string(),
            row: 3,
            value: String::new(),
            expected: "text",
        }
    );
}

#[test]
fn blank_edge_color_on_used_level_is_a_type_mismatch() {
    let (graph, mut style) = fixtures();
    sheet_mut(&mut style, "Edge").rows[1][2] = CellValue::Empty;

    match validate_workbooks(&graph, &style).unwrap_err() {
        SchemaError::TypeMismatch { sheet, column, row, .. } => {
            assert_eq!(sheet, "Edge");
            assert_eq!(column, "edge_color");
            assert_eq!(row, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn names_keep_their_spacing_while_keys_are_trimmed() {
    let (mut graph, style) = fixtures();
    let node = sheet_mut(&mut graph, "Node");
    node.rows[1][1] = CellValue::from(" Jane  Doe ");
    node.rows[1][4] = CellValue::from("Individual ");

    let validated = validate_workbooks(&graph, &style).expect("padded key still joins");
    let jane = &validated.graph.nodes[1];
    assert_eq!(jane.name, " Jane  Doe ");
    assert_eq!(jane.subtype, "Individual");
}
