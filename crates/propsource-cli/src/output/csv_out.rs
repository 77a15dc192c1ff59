use serde_json::{Map, Value};
use std::io;

use super::{as_grid, flatten_fields, format_scalar, Grid};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Sensitivity grids become one row per interest rate; everything else is a
/// two-column `field,value` listing with nested keys dotted.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => match as_grid(result) {
                Some(grid) => write_grid(&mut wtr, &grid),
                None => write_fields(&mut wtr, result),
            },
            _ => write_fields(&mut wtr, map),
        },
        _ => {
            let _ = wtr.write_record([format_scalar(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in flatten_fields(map) {
        let _ = wtr.write_record([key, val]);
    }
}

fn write_grid(wtr: &mut StdoutWriter<'_>, grid: &Grid<'_>) {
    let mut header = vec!["interest_rate_percent".to_string()];
    header.extend(
        grid.col_values
            .iter()
            .map(|ltv| format!("ltv_{}", format_scalar(ltv))),
    );
    let _ = wtr.write_record(&header);

    for (rate, row) in grid.row_values.iter().zip(grid.matrix) {
        let mut record = vec![format_scalar(rate)];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(format_scalar));
        }
        let _ = wtr.write_record(&record);
    }
}
