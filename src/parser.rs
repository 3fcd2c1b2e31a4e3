//! Request body parsing
//!
//! Turns the raw JSON body of `POST /generate-excel` into a typed
//! [`WorkbookRequest`]. This is the only place the dynamic JSON value is
//! inspected; checks run in order and the first failure is returned.

use crate::error::{ServiceError, ServiceResult};
use crate::types::{CellValue, Sheet, WorkbookRequest};
use serde_json::{Map, Value};

/// Parse a raw request body. An empty body counts as `{}`.
pub fn parse_body(body: &[u8]) -> ServiceResult<WorkbookRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return parse_request(Value::Object(Map::new()));
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| ServiceError::MalformedBody(e.to_string()))?;
    parse_request(value)
}

/// Parse an already decoded JSON payload
pub fn parse_request(value: Value) -> ServiceResult<WorkbookRequest> {
    let mut payload = match value {
        Value::Object(map) => map,
        _ => return Err(ServiceError::missing_sheets()),
    };

    let sheets = match payload.remove("sheets") {
        Some(Value::Object(sheets)) => sheets,
        _ => return Err(ServiceError::missing_sheets()),
    };

    if sheets.is_empty() {
        return Err(ServiceError::EmptyPayload);
    }

    // Map iteration follows insertion order (serde_json `preserve_order`)
    let sheets = sheets
        .into_iter()
        .map(|(name, rows)| parse_sheet(name, rows))
        .collect::<ServiceResult<Vec<_>>>()?;

    let filename = match payload.remove("filename") {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(name),
        Some(_) => {
            return Err(ServiceError::InvalidPayload(
                "\"filename\" must be a string.".to_string(),
            ))
        }
    };

    WorkbookRequest::new(sheets, filename)
}

fn parse_sheet(name: String, rows: Value) -> ServiceResult<Sheet> {
    let Value::Array(rows) = rows else {
        return Err(ServiceError::sheet_not_array(name));
    };

    let mut parsed_rows = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.into_iter().enumerate() {
        let Value::Array(cells) = row else {
            return Err(ServiceError::InvalidSheetData {
                sheet: name,
                problem: format!("row {} must be an array of cells", row_idx),
            });
        };

        let mut parsed_cells = Vec::with_capacity(cells.len());
        for (col_idx, cell) in cells.into_iter().enumerate() {
            match parse_cell(cell) {
                Some(value) => parsed_cells.push(value),
                None => {
                    return Err(ServiceError::InvalidSheetData {
                        sheet: name,
                        problem: format!(
                            "row {}, column {}: cells must be strings, numbers, booleans or null",
                            row_idx, col_idx
                        ),
                    })
                }
            }
        }
        parsed_rows.push(parsed_cells);
    }

    Ok(Sheet::new(name, parsed_rows))
}

fn parse_cell(value: Value) -> Option<CellValue> {
    match value {
        Value::Null => Some(CellValue::Empty),
        Value::Bool(b) => Some(CellValue::Bool(b)),
        Value::Number(n) => n.as_f64().map(CellValue::Number),
        Value::String(s) => Some(CellValue::Text(s)),
        Value::Array(_) | Value::Object(_) => None,
    }
}
