use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{as_grid, flatten_fields, format_scalar, Grid};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result_table(result, map),
            _ => print_field_table(map),
        },
        _ => println!("{}", format_scalar(value)),
    }
}

fn print_result_table(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    match as_grid(result) {
        Some(grid) => {
            print_grid(&grid);
            if let Some(metric) = result.get("output_metric") {
                println!("\nMetric: {}", format_scalar(metric));
            }
        }
        None => print_field_table(result),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                println!("  - {}", format_scalar(w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_fields(map) {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));
}

/// Rows are interest rates, columns are loan-to-value percentages.
fn print_grid(grid: &Grid<'_>) {
    let mut builder = Builder::default();

    let mut header = vec!["Rate % \\ LTV %".to_string()];
    header.extend(grid.col_values.iter().map(format_scalar));
    builder.push_record(header);

    for (rate, row) in grid.row_values.iter().zip(grid.matrix) {
        let mut record = vec![format_scalar(rate)];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(format_scalar));
        }
        builder.push_record(record);
    }

    println!("{}", Table::from(builder));
}
