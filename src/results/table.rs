use crate::query::models::{PaginationState, QueryResult};
use crate::results::columns::{discover_columns, visible_columns, Align};
use crate::results::format::format_value;
use crate::results::pagination::initial_pagination;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    pub key: &'static str,
    pub label: &'static str,
    pub align: Align,
}

/// Render-ready view of a result page: columns, formatted cells and window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub question: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub pagination: PaginationState,
    pub total_pages: u64,
    pub summary: String,
    /// Explanation from the query service when the question could not be answered.
    pub message: Option<String>,
}

impl TableView {
    pub fn build(result: &QueryResult, max_columns: Option<usize>, fallback_page_size: u64) -> Self {
        let pagination = initial_pagination(result, fallback_page_size);
        let message = result.failure_message().map(str::to_string);

        // a failed question shows only the explanation
        let (columns, rows) = if message.is_some() {
            (Vec::new(), Vec::new())
        } else {
            let available = discover_columns(&result.results);
            let visible = visible_columns(&available, max_columns);

            let rows = result
                .results
                .iter()
                .map(|row| {
                    visible
                        .iter()
                        .map(|c| format_value(row.get(c.field), c.data_type))
                        .collect()
                })
                .collect();

            let columns = visible
                .iter()
                .map(|c| TableColumn {
                    key: c.field.key(),
                    label: c.label,
                    align: c.align,
                })
                .collect();

            (columns, rows)
        };

        Self {
            question: result.original_query.clone(),
            columns,
            rows,
            total_pages: pagination.total_pages(),
            summary: pagination.summary(),
            pagination,
            message,
        }
    }

    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        if let Some(message) = &self.message {
            return format!("{}\n", message);
        }
        if self.columns.is_empty() {
            return format!("{}\n", self.summary);
        }

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.label.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c.label, *w, c.align))
            .collect();
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut out = String::new();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');
        out.push_str(&rule.join("  "));
        out.push('\n');
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(self.columns.iter().zip(&widths))
                .map(|(cell, (c, w))| pad(cell, *w, c.align))
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out.push_str(&self.summary);
        out.push('\n');
        out
    }
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = width.saturating_sub(text.chars().count());
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(fill)),
        Align::Right => format!("{}{}", " ".repeat(fill), text),
        Align::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
        }
    }
}
