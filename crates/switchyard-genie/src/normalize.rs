// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of Genie responses as chat text.
//!
//! Record lists become markdown pipe tables; other JSON objects are
//! pretty-printed; plain text passes through. Rendering never fails: a list
//! that cannot be tabulated falls back to pretty-printed JSON.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Text shown for an empty result set.
pub const NO_DATA: &str = "No data found.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("row {index} is not a record")]
    NotARecord { index: usize },
    #[error("expected a list of records, got {0}")]
    NotAList(&'static str),
}

/// Render any JSON response value.
pub fn normalize(payload: &Value) -> String {
    match payload {
        Value::String(text) => normalize_text(text),
        Value::Array(_) => format_table(payload),
        Value::Object(map) => normalize_object(map),
        Value::Null => NO_DATA.to_string(),
        scalar => scalar.to_string(),
    }
}

/// Render tool text that may or may not be JSON.
pub fn normalize_text(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(rows @ Value::Array(_)) => format_table(&rows),
        Ok(Value::Object(map)) => normalize_object(&map),
        _ => text.to_string(),
    }
}

fn normalize_object(map: &Map<String, Value>) -> String {
    match map.get("data") {
        Some(data) => format_table(data),
        None => pretty(&Value::Object(map.clone())),
    }
}

fn format_table(data: &Value) -> String {
    if is_empty(data) {
        return NO_DATA.to_string();
    }
    let rendered = match data {
        Value::Array(rows) => render_table(rows),
        other => Err(TableError::NotAList(type_name(other))),
    };
    rendered.unwrap_or_else(|e| {
        debug!(error = %e, "table rendering failed, falling back to JSON");
        pretty(data)
    })
}

/// Render records as a markdown pipe table.
///
/// Columns are the union of record keys in first-seen order. Columns whose
/// values are all numeric are right-aligned.
pub fn render_table(rows: &[Value]) -> Result<String, TableError> {
    if rows.is_empty() {
        return Ok(NO_DATA.to_string());
    }

    let records = rows
        .iter()
        .enumerate()
        .map(|(index, row)| row.as_object().ok_or(TableError::NotARecord { index }))
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns: Vec<&str> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|record| columns.iter().map(|c| cell(record.get(*c))).collect())
        .collect();

    let numeric: Vec<bool> = columns
        .iter()
        .map(|c| {
            let mut values = records.iter().filter_map(|r| r.get(*c)).filter(|v| !v.is_null());
            let mut any = false;
            let all = values.all(|v| {
                any = true;
                v.is_number()
            });
            any && all
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: &mut dyn Iterator<Item = &str>| {
        let mut out = String::from("|");
        for (i, value) in values.enumerate() {
            let width = widths[i];
            if numeric[i] {
                out.push_str(&format!(" {value:>width$} |"));
            } else {
                out.push_str(&format!(" {value:<width$} |"));
            }
        }
        out
    };

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(line(&mut columns.iter().copied()));
    let separator: String = widths
        .iter()
        .zip(&numeric)
        .map(|(w, right)| {
            let dashes = "-".repeat(w + 1);
            if *right {
                format!("{dashes}:|")
            } else {
                format!(":{dashes}|")
            }
        })
        .collect();
    lines.push(format!("|{separator}"));
    for row in &cells {
        lines.push(line(&mut row.iter().map(String::as_str)));
    }
    Ok(lines.join("\n"))
}

fn cell(value: Option<&Value>) -> String {
    let raw = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    raw.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_render_as_pipe_table() {
        let table = normalize(&json!([
            {"name": "A", "count": 3},
            {"name": "Bob", "count": 12}
        ]));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| name | count |");
        assert_eq!(lines[1], "|:-----|------:|");
        assert_eq!(lines[2], "| A    |     3 |");
        assert_eq!(lines[3], "| Bob  |    12 |");
    }

    #[test]
    fn columns_are_union_in_first_seen_order() {
        let table = render_table(&[json!({"b": 1}), json!({"a": "x", "b": 2})]).unwrap();
        let header = table.lines().next().unwrap();
        assert_eq!(header, "| b | a |");
        let first_row = table.lines().nth(2).unwrap();
        assert_eq!(first_row, "| 1 |   |");
    }

    #[test]
    fn data_key_is_tabulated() {
        let text = r#"{"data": [{"region": "North", "clients": 40}]}"#;
        let table = normalize_text(text);
        assert!(table.starts_with("| region | clients |"));
        assert_eq!(table.lines().count(), 3);
    }

    #[test]
    fn empty_inputs_say_no_data() {
        assert_eq!(normalize(&json!([])), NO_DATA);
        assert_eq!(normalize(&Value::Null), NO_DATA);
        assert_eq!(normalize(&json!({"data": []})), NO_DATA);
        assert_eq!(normalize_text("[]"), NO_DATA);
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(normalize_text("There are 42 clients."), "There are 42 clients.");
        assert_eq!(normalize(&json!("There are 42 clients.")), "There are 42 clients.");
        // Valid JSON that is neither list nor object is left alone.
        assert_eq!(normalize_text("42"), "42");
    }

    #[test]
    fn objects_without_data_are_pretty_printed() {
        let out = normalize(&json!({"answer": "yes"}));
        assert_eq!(out, "{\n  \"answer\": \"yes\"\n}");
    }

    #[test]
    fn scalars_render_as_json_text() {
        assert_eq!(normalize(&json!(7)), "7");
        assert_eq!(normalize(&json!(true)), "true");
    }

    #[test]
    fn non_record_rows_fall_back_to_json() {
        assert_eq!(
            render_table(&[json!({"a": 1}), json!(2)]),
            Err(TableError::NotARecord { index: 1 })
        );
        let out = normalize(&json!([1, 2]));
        assert_eq!(out, "[\n  1,\n  2\n]");
    }

    #[test]
    fn non_list_data_falls_back_to_json() {
        let out = normalize(&json!({"data": "oops"}));
        assert_eq!(out, "\"oops\"");
    }

    #[test]
    fn pipes_and_newlines_are_escaped() {
        let table = render_table(&[json!({"note": "a|b\nc"})]).unwrap();
        assert!(table.contains("a\\|b c"));
    }

    #[test]
    fn nested_values_render_compact() {
        let table = render_table(&[json!({"tags": ["x", "y"], "flag": null})]).unwrap();
        assert!(table.contains(r#"["x","y"]"#));
    }
}
