//! Workbook-level schema validation.
//!
//! Checks run phase by phase across all five sheets (presence, columns, blank
//! rows, type coercion) so the first reported failure does not depend on which
//! sheet happens to be inspected first. The result is either fully typed tables
//! or the first failure; nothing partially coerced escapes.
//!
//! Style text columns may be blank on rows the graph never joins; only the
//! first style row of each used category or level must be complete.

use std::collections::{BTreeMap, HashSet};

use relmap_model::{
    BrandingConfig, ConnectionRecord, EdgeStyleRule, GraphTables, GridEntry, LabelFont,
    NodeRecord, StyleRule, StyleTables, DATA_GRID_SLOTS,
};

use crate::schema::{
    check_blank_rows, check_columns, check_joined_cells, coerce_sheet, SheetSchema, Table,
    TypedRow, ALL_SHEETS, CONNECTIONS_SHEET, EDGE_STYLE_SHEET, GLOBAL_SHEET,
    LEGEND_CAPTION_PREFIX, NODE_SHEET, NODE_STYLE_SHEET,
};
use crate::workbook::{Sheet, Workbook, WorkbookRole};
use crate::SchemaError;

/// Output of a successful schema pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedWorkbooks {
    pub graph: GraphTables,
    pub style: StyleTables,
}

pub fn validate_workbooks(
    graph: &Workbook,
    style: &Workbook,
) -> Result<ValidatedWorkbooks, SchemaError> {
    let pick = |role: WorkbookRole| match role {
        WorkbookRole::Graph => graph,
        WorkbookRole::Style => style,
    };

    let mut sheets: Vec<(&SheetSchema, &Sheet)> = Vec::with_capacity(ALL_SHEETS.len());
    for schema in ALL_SHEETS.iter() {
        let sheet = pick(schema.workbook).sheet(schema.sheet).ok_or_else(|| {
            SchemaError::MissingSheet {
                workbook: schema.workbook,
                sheet: schema.sheet.to_string(),
            }
        })?;
        sheets.push((schema, sheet));
    }

    for (schema, sheet) in &sheets {
        check_columns(sheet, schema)?;
    }
    for (schema, sheet) in &sheets {
        check_blank_rows(sheet, schema)?;
    }
    let mut tables = Vec::with_capacity(sheets.len());
    for (schema, sheet) in &sheets {
        tables.push(coerce_sheet(sheet, schema)?);
    }

    let table = |schema: &SheetSchema| find_table(&tables, schema);

    let used_subtypes = key_set(table(&NODE_SHEET)?, "SubType")?;
    check_joined_cells(
        table(&NODE_STYLE_SHEET)?,
        &NODE_STYLE_SHEET,
        "Component",
        &used_subtypes,
    )?;
    let used_levels = key_set(table(&CONNECTIONS_SHEET)?, "Level")?;
    check_joined_cells(table(&EDGE_STYLE_SHEET)?, &EDGE_STYLE_SHEET, "L2", &used_levels)?;

    let global = table(&GLOBAL_SHEET)?;
    let first_global = global.rows().next().ok_or_else(|| SchemaError::EmptySheet {
        sheet: GLOBAL_SHEET.sheet.to_string(),
    })?;

    let graph_tables = GraphTables {
        nodes: table(&NODE_SHEET)?
            .rows()
            .map(|r| node_from_row(&r))
            .collect::<Result<_, _>>()?,
        connections: table(&CONNECTIONS_SHEET)?
            .rows()
            .map(|r| connection_from_row(&r))
            .collect::<Result<_, _>>()?,
    };
    let style_tables = StyleTables {
        node_styles: table(&NODE_STYLE_SHEET)?
            .rows()
            .map(|r| style_rule_from_row(&r))
            .collect::<Result<_, _>>()?,
        edge_styles: table(&EDGE_STYLE_SHEET)?
            .rows()
            .map(|r| edge_style_from_row(&r))
            .collect::<Result<_, _>>()?,
        branding: branding_from_row(&first_global, global)?,
    };

    tracing::info!(
        nodes = graph_tables.nodes.len(),
        connections = graph_tables.connections.len(),
        node_styles = style_tables.node_styles.len(),
        edge_styles = style_tables.edge_styles.len(),
        "schema validation passed"
    );

    Ok(ValidatedWorkbooks {
        graph: graph_tables,
        style: style_tables,
    })
}

fn find_table<'a>(tables: &'a [Table], schema: &SheetSchema) -> Result<&'a Table, SchemaError> {
    tables
        .iter()
        .find(|t| t.sheet == schema.sheet)
        .ok_or_else(|| SchemaError::MissingSheet {
            workbook: schema.workbook,
            sheet: schema.sheet.to_string(),
        })
}

fn key_set<'a>(table: &'a Table, column: &str) -> Result<HashSet<&'a str>, SchemaError> {
    let mut keys = HashSet::new();
    for row in table.rows() {
        if let Some(key) = row.key(column)? {
            keys.insert(key);
        }
    }
    Ok(keys)
}

fn node_from_row(row: &TypedRow<'_>) -> Result<NodeRecord, SchemaError> {
    let mut grid: [GridEntry; DATA_GRID_SLOTS] = Default::default();
    for (i, entry) in grid.iter_mut().enumerate() {
        let slot = i + 1;
        entry.title = row.opt_text(&format!("data_grid_title{slot}"))?;
        entry.info = row.opt_text(&format!("data_grid_info{slot}"))?;
    }

    Ok(NodeRecord {
        id: row.int("Node Id")?,
        name: row.text("Name")?,
        node_type: row.text("Type")?,
        relationship: row.opt_text("Relationship")?,
        subtype: row.text("SubType")?,
        grid,
    })
}

fn connection_from_row(row: &TypedRow<'_>) -> Result<ConnectionRecord, SchemaError> {
    Ok(ConnectionRecord {
        uid: row.opt_text("UId")?,
        from: row.int("from")?,
        to: row.opt_int("to")?,
        level: row.text("Level")?,
    })
}

fn style_rule_from_row(row: &TypedRow<'_>) -> Result<StyleRule, SchemaError> {
    Ok(StyleRule {
        category: row.text("Component")?,
        image: row.joined_text("node_image")?,
        color: row.joined_text("node_color")?,
        label_font: LabelFont {
            alignment: row.joined_text("node_label_font_alignment")?,
            color: row.joined_text("node_label_font_color")?,
            background: row.joined_text("node_label_font_background")?,
            size: row.int("node_label_font_size")?,
        },
        shape: row.joined_text("node_shape")?,
        size: row.int("node_size")?,
        shadow: row.int("node_shadow")?,
    })
}

fn edge_style_from_row(row: &TypedRow<'_>) -> Result<EdgeStyleRule, SchemaError> {
    Ok(EdgeStyleRule {
        level: row.text("L2")?,
        width: row.int("edge_width")?,
        color: row.joined_text("edge_color")?,
        length: row.int("edge_length")?,
        dashes: row.int("edge_dashes")?,
        connection_type: row.opt_text("connection_type")?,
    })
}

fn branding_from_row(row: &TypedRow<'_>, global: &Table) -> Result<BrandingConfig, SchemaError> {
    let mut legend_captions = BTreeMap::new();
    for column in &global.columns {
        let Some(category) = column.strip_prefix(LEGEND_CAPTION_PREFIX) else {
            continue;
        };
        if let Some(caption) = row.opt_text(column)? {
            legend_captions.insert(category.to_string(), caption);
        }
    }

    Ok(BrandingConfig {
        client_name: row.text("client_name")?,
        logo_url: row.text("logo_url")?,
        sidebar_short_logo: row.text("sidebar_short_logo")?,
        background_mode: row.json("background_mode")?,
        legend_captions,
    })
}
