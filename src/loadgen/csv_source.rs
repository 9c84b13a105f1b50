//! Invoice payloads read from a CSV export, one invoice per row.

use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde_json::{Map, Value};

use super::literal::parse_list;
use super::LoadError;

/// Columns holding a list literal such as `['a', 'b']` or `[1, 2.5]`.
pub const LIST_FIELDS: [&str; 6] = [
    "HS_Codes",
    "Marks_and_Nos",
    "Packages",
    "Descriptions",
    "Quantities",
    "Rates",
];

pub const QUANTITIES_FIELD: &str = "Quantities";
pub const TOTAL_QUANTITY_FIELD: &str = "Total_Quantity";

/// Turn one CSV record into the JSON body posted to the endpoint.
///
/// List columns that fail to parse are logged and sent as `[]` so the
/// server gets to reject the row. `Total_Quantity` becomes a number when it
/// parses as one and whole floats in `Quantities` become integers; every
/// other column is sent as its raw text.
pub fn row_to_payload(headers: &StringRecord, record: &StringRecord) -> Value {
    let mut payload = Map::new();

    for (name, cell) in headers.iter().zip(record.iter()) {
        let value = if LIST_FIELDS.contains(&name) {
            match parse_list(cell) {
                Ok(items) if name == QUANTITIES_FIELD => {
                    Value::Array(items.into_iter().map(whole_float_to_int).collect())
                }
                Ok(items) => Value::Array(items),
                Err(e) => {
                    log::warn!("Error parsing {}: {}", name, e);
                    Value::Array(Vec::new())
                }
            }
        } else if name == TOTAL_QUANTITY_FIELD {
            quantity_value(cell)
        } else {
            Value::String(cell.to_string())
        };
        payload.insert(name.to_string(), value);
    }

    Value::Object(payload)
}

fn whole_float_to_int(value: Value) -> Value {
    match value.as_f64() {
        Some(float) if value.is_f64() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 => {
            Value::from(float as i64)
        }
        _ => value,
    }
}

fn quantity_value(cell: &str) -> Value {
    let trimmed = cell.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    // Spreadsheets like to export whole numbers as `250.0`.
    match trimmed.parse::<f64>() {
        Ok(float) if float.fract() == 0.0 && float.is_finite() => Value::from(float as i64),
        _ => Value::String(cell.to_string()),
    }
}

/// Read every row of `reader`. A malformed row yields an `Err` in its slot
/// so the batch can report it and keep numbering aligned with the file.
pub fn read_payloads_from<R: io::Read>(reader: R) -> Result<Vec<Result<Value, LoadError>>, LoadError> {
    let mut reader = ReaderBuilder::new().flexible(false).from_reader(reader);
    let headers = reader.headers()?.clone();

    Ok(reader
        .records()
        .map(|record| {
            record
                .map(|record| row_to_payload(&headers, &record))
                .map_err(LoadError::from)
        })
        .collect())
}

pub fn read_payloads(path: &Path) -> Result<Vec<Result<Value, LoadError>>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_payloads_from(io::BufReader::new(file))
}
