//! Output formatting for view pages.
//!
//! Supports table and JSON output formats.

use comfy_table::Attribute;
use comfy_table::Cell;
use comfy_table::CellAlignment;
use comfy_table::ContentArrangement;
use comfy_table::Table;
use deeptable_lib::TableView;
use deeptable_lib::filter::FilterOption;
use deeptable_lib::model::CellAlign;
use deeptable_lib::sort::SortIndicator;
use deeptable_lib::view::ViewSnapshot;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Formatted table output.
    Table,
    /// JSON output.
    Json,
}

/// Formats the current page of a view.
pub fn format_view(view: &TableView, format: OutputFormat) -> String {
    let snapshot = view.snapshot();
    match format {
        OutputFormat::Table => format_table(&snapshot, view.config().selectable),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&snapshot).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Formats the choices of a filter column.
pub fn format_options(options: &[FilterOption], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_header(vec!["Option", "Value"]);
            for option in options {
                table.add_row(vec![option.label.clone(), option.value.option_key()]);
            }
            table.to_string()
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(options).unwrap_or_else(|_| "[]".to_string())
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

/// Formats the snapshot as a table followed by the pagination line.
fn format_table(snapshot: &ViewSnapshot, selectable: bool) -> String {
    let mut table = new_table();

    let mut header: Vec<Cell> = Vec::new();
    if selectable {
        header.push(Cell::new(if snapshot.all_selected { "[x]" } else { "[ ]" }));
    }
    for column in &snapshot.headers {
        let marker = match column.sort {
            SortIndicator::Asc => " ▲",
            SortIndicator::Desc => " ▼",
            SortIndicator::None => "",
        };
        let mut cell = Cell::new(format!("{}{}", column.label, marker));
        if column.highlighted {
            cell = cell.add_attribute(Attribute::Bold);
        }
        header.push(cell);
    }
    table.set_header(header);

    for row in &snapshot.rows {
        let mut cells: Vec<Cell> = Vec::new();
        if selectable {
            cells.push(Cell::new(if row.selected { "[x]" } else { "[ ]" }));
        }
        cells.extend(row.cells.iter().map(Cell::new));
        table.add_row(cells);
    }

    let offset = usize::from(selectable);
    for (i, column) in snapshot.headers.iter().enumerate() {
        if let Some(table_column) = table.column_mut(i + offset) {
            table_column.set_cell_alignment(match column.align {
                CellAlign::Left => CellAlignment::Left,
                CellAlign::Center => CellAlignment::Center,
                CellAlign::Right => CellAlignment::Right,
            });
        }
    }

    format!("{}\n{}", table, footer(snapshot))
}

fn footer(snapshot: &ViewSnapshot) -> String {
    let pages = snapshot
        .page_numbers
        .iter()
        .map(|page| {
            if *page == snapshot.current_page {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut line = format!("{}  pages: {}", snapshot.summary, pages);
    if snapshot.selected_count > 0 {
        line.push_str(&format!("  selected: {}", snapshot.selected_count));
    }
    line
}

#[cfg(test)]
mod tests {
    use deeptable_lib::ViewConfig;
    use deeptable_lib::model::Column;
    use deeptable_lib::model::Row;
    use deeptable_lib::model::Schema;
    use deeptable_lib::model::SemanticType;

    use super::*;

    fn view() -> TableView {
        let schema = Schema::new(vec![
            Column::new("name", "Name", SemanticType::String),
            Column::new("max_age", "Max Age", SemanticType::Integer).align(CellAlign::Right),
        ])
        .unwrap();
        let rows = (0..7)
            .map(|i| Row::new().set("name", format!("dog {i}")).set("max_age", i))
            .collect();
        let config = ViewConfig::default().with_page_size(5).with_selectable(true);
        TableView::new(schema, rows, config).unwrap()
    }

    #[test]
    fn test_table_output() {
        let mut view = view();
        view.toggle_sort("max_age").unwrap();
        view.select_visible().unwrap();

        let text = format_view(&view, OutputFormat::Table);
        assert!(text.contains("Max Age ▲"));
        assert!(text.contains("dog 4"));
        assert!(!text.contains("dog 5"));
        assert!(text.ends_with("1-5 of 7  pages: [1] 2  selected: 5"));
    }

    #[test]
    fn test_json_output() {
        let text = format_view(&view(), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["page_count"], 2);
        assert_eq!(parsed["rows"].as_array().unwrap().len(), 5);
    }
}
