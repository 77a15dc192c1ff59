pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into `(dotted.key, value)` pairs. Arrays are kept
/// whole and rendered by `format_scalar`.
pub(crate) fn flatten_fields(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    for (key, val) in map {
        push_flattened(key, val, &mut rows);
    }
    rows
}

fn push_flattened(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(inner) if !inner.is_empty() => {
            for (key, val) in inner {
                push_flattened(&format!("{prefix}.{key}"), val, rows);
            }
        }
        _ => rows.push((prefix.to_string(), format_scalar(value))),
    }
}

/// The rate x LTV grid, if `result` is a sensitivity output.
pub(crate) struct Grid<'a> {
    pub row_values: &'a [Value],
    pub col_values: &'a [Value],
    pub matrix: &'a [Value],
}

pub(crate) fn as_grid(result: &Map<String, Value>) -> Option<Grid<'_>> {
    Some(Grid {
        row_values: result.get("interest_rate_values")?.as_array()?,
        col_values: result.get("loan_to_value_values")?.as_array()?,
        matrix: result.get("matrix")?.as_array()?,
    })
}

pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_scalar).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
