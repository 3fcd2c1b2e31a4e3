//! Workbook exporter: typed sheets → in-memory .xlsx buffer

use crate::error::{ServiceError, ServiceResult};
use crate::types::{CellValue, Sheet, WorkbookRequest};
use rust_xlsxwriter::{Workbook, Worksheet};

/// MIME type of the generated file
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Builds an .xlsx workbook from validated sheets.
///
/// Each sheet becomes one worksheet, in order. Row `r`, cell `c` of the input
/// lands at (r, c) with no header inference; empty cells are skipped.
pub struct WorkbookExporter<'a> {
    sheets: &'a [Sheet],
}

impl<'a> WorkbookExporter<'a> {
    pub fn new(request: &'a WorkbookRequest) -> Self {
        Self {
            sheets: request.sheets(),
        }
    }

    /// Export directly from a slice of sheets
    pub fn from_sheets(sheets: &'a [Sheet]) -> Self {
        Self { sheets }
    }

    /// Encode the workbook. The encoder deflates every part of the package.
    pub fn to_buffer(&self) -> ServiceResult<Vec<u8>> {
        let mut workbook = Workbook::new();

        for sheet in self.sheets {
            self.export_sheet(&mut workbook, sheet)?;
        }

        workbook
            .save_to_buffer()
            .map_err(|e| ServiceError::EncodingFailure(format!("Failed to save workbook: {}", e)))
    }

    fn export_sheet(&self, workbook: &mut Workbook, sheet: &Sheet) -> ServiceResult<()> {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name).map_err(|e| {
            ServiceError::EncodingFailure(format!(
                "Failed to set worksheet name \"{}\": {}",
                sheet.name, e
            ))
        })?;

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let excel_row = u32::try_from(row_idx).map_err(|_| {
                ServiceError::EncodingFailure(format!(
                    "Sheet \"{}\" has too many rows",
                    sheet.name
                ))
            })?;

            for (col_idx, cell) in row.iter().enumerate() {
                let excel_col = u16::try_from(col_idx).map_err(|_| {
                    ServiceError::EncodingFailure(format!(
                        "Sheet \"{}\" has too many columns",
                        sheet.name
                    ))
                })?;
                Self::write_cell(worksheet, excel_row, excel_col, cell).map_err(|e| {
                    ServiceError::EncodingFailure(format!(
                        "Failed to write cell ({}, {}) in sheet \"{}\": {}",
                        row_idx, col_idx, sheet.name, e
                    ))
                })?;
            }
        }

        Ok(())
    }

    fn write_cell(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &CellValue,
    ) -> Result<(), rust_xlsxwriter::XlsxError> {
        match cell {
            CellValue::Empty => {}
            CellValue::Bool(b) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            CellValue::Number(n) => {
                worksheet.write_number(row, col, *n)?;
            }
            CellValue::Text(s) => {
                worksheet.write_string(row, col, s)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str) -> Sheet {
        Sheet::new(name, vec![vec!["a".into(), 1.0.into()]])
    }

    #[test]
    fn test_buffer_is_zip_package() {
        let sheets = vec![sheet("Sheet1")];
        let buffer = WorkbookExporter::from_sheets(&sheets).to_buffer().unwrap();
        // Local file header signature
        assert_eq!(&buffer[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_empty_sheet_exports() {
        let sheets = vec![Sheet::new("Blank", Vec::new())];
        assert!(WorkbookExporter::from_sheets(&sheets).to_buffer().is_ok());
    }

    #[test]
    fn test_invalid_sheet_name_is_encoding_failure() {
        let sheets = vec![sheet("bad[name]")];
        let err = WorkbookExporter::from_sheets(&sheets).to_buffer().unwrap_err();
        assert!(matches!(err, ServiceError::EncodingFailure(_)));
        assert!(err.to_string().contains("bad[name]"));
    }

    #[test]
    fn test_sheet_name_too_long_is_encoding_failure() {
        let sheets = vec![sheet(&"x".repeat(32))];
        let err = WorkbookExporter::from_sheets(&sheets).to_buffer().unwrap_err();
        assert!(matches!(err, ServiceError::EncodingFailure(_)));
    }

    #[test]
    fn test_case_insensitive_duplicate_names_fail() {
        let sheets = vec![sheet("Data"), sheet("data")];
        let err = WorkbookExporter::from_sheets(&sheets).to_buffer().unwrap_err();
        assert!(matches!(err, ServiceError::EncodingFailure(_)));
    }
}
