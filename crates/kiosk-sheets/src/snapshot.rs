//! Conversion of a gviz query response into an ordered row snapshot.

use std::collections::HashMap;

use serde::Deserialize;

/// One data row, keyed by the snapshot's column labels.
pub type Row = HashMap<String, String>;

/// A point-in-time read of one table region: the resolved column labels in
/// table order, and the non-empty data rows.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Snapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub errors: Vec<GvizError>,
    #[serde(default)]
    pub table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizError {
    #[serde(default)]
    pub detailed_message: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl GvizError {
    pub(crate) fn text(&self) -> &str {
        self.detailed_message
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("unknown provider error")
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizTable {
    #[serde(default)]
    pub cols: Vec<GvizCol>,
    #[serde(default)]
    pub rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizCol {
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizRow {
    #[serde(default)]
    pub c: Vec<Option<GvizCell>>,
}

/// A single cell: `v` is the literal value, `f` the formatted display string.
#[derive(Debug, Deserialize)]
pub(crate) struct GvizCell {
    #[serde(default)]
    pub v: Option<serde_json::Value>,
    #[serde(default)]
    pub f: Option<String>,
}

/// Renders a cell as text: literal value first, formatted string second.
/// Date literals serialize as `"Date(...)"` strings; for those the formatted
/// display string is the usable representation.
fn cell_text(cell: Option<&GvizCell>) -> String {
    let Some(cell) = cell else {
        return String::new();
    };
    match &cell.v {
        Some(serde_json::Value::String(s)) => {
            if s.starts_with("Date(") {
                cell.f.clone().unwrap_or_else(|| s.clone())
            } else {
                s.clone()
            }
        }
        Some(serde_json::Value::Number(n)) => number_text(n),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        Some(serde_json::Value::Null) | None => cell.f.clone().unwrap_or_default(),
        Some(_) => cell.f.clone().unwrap_or_default(),
    }
}

/// gviz serializes numeric cells as floats, so a 6-digit code arrives as
/// `654321.0`. Integral values must render without the fraction or they
/// never compare equal to typed input.
fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        // f64 Display prints integral values without a trailing `.0`.
        n.as_f64().map_or_else(|| n.to_string(), |v| v.to_string())
    }
}

impl Snapshot {
    /// Builds a snapshot from a parsed gviz table.
    ///
    /// Column labels are trimmed. When every label is blank, or the table
    /// carries no column entries at all, the first data row is promoted to
    /// the header row (blank cells become `colN`). Rows that are empty
    /// across all columns are dropped.
    pub(crate) fn from_table(table: Option<GvizTable>) -> Self {
        let Some(table) = table else {
            return Self::default();
        };

        let mut columns: Vec<String> = table
            .cols
            .iter()
            .map(|c| c.label.as_deref().unwrap_or("").trim().to_owned())
            .collect();
        let mut data_rows = table.rows;

        // A table may omit `cols` entirely; size the header off the first row.
        if columns.is_empty() {
            let width = data_rows.first().map_or(0, |row| row.c.len());
            columns = vec![String::new(); width];
        }

        let all_blank = !columns.is_empty() && columns.iter().all(String::is_empty);
        if all_blank && !data_rows.is_empty() {
            let header_row = data_rows.remove(0);
            columns = columns
                .iter()
                .enumerate()
                .map(|(i, _)| {
                    let derived = header_row
                        .c
                        .get(i)
                        .map(|cell| cell_text(cell.as_ref()).trim().to_owned())
                        .unwrap_or_default();
                    if derived.is_empty() {
                        format!("col{}", i + 1)
                    } else {
                        derived
                    }
                })
                .collect();
        }

        let mut rows = Vec::with_capacity(data_rows.len());
        for raw in &data_rows {
            let mut row = Row::with_capacity(columns.len());
            let mut empty = true;
            for (i, label) in columns.iter().enumerate() {
                let value = raw
                    .c
                    .get(i)
                    .map(|cell| cell_text(cell.as_ref()))
                    .unwrap_or_default();
                if !value.trim().is_empty() {
                    empty = false;
                }
                row.insert(label.clone(), value);
            }
            if !empty {
                rows.push(row);
            }
        }

        Self { columns, rows }
    }
}
