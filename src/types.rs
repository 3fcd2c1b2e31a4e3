use crate::error::{ServiceError, ServiceResult};

/// File name used when the request does not supply one.
pub const DEFAULT_FILENAME: &str = "generated_file.xlsx";

/// A single cell as sent by the client
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// `null`: no cell is written
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// A named grid of cells. Rows may differ in length.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// A validated workbook request: at least one sheet, in the order sent.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookRequest {
    sheets: Vec<Sheet>,
    filename: Option<String>,
}

impl WorkbookRequest {
    pub fn new(sheets: Vec<Sheet>, filename: Option<String>) -> ServiceResult<Self> {
        if sheets.is_empty() {
            return Err(ServiceError::EmptyPayload);
        }
        Ok(Self { sheets, filename })
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The download name: the requested one unless absent or empty.
    pub fn resolved_filename(&self) -> &str {
        match self.filename.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_FILENAME,
        }
    }
}
