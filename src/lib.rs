//! Excel Generator - JSON sheets in, .xlsx download out
//!
//! This library backs an HTTP service that accepts a JSON description of
//! named sheets (arrays of rows of cells) and returns a generated Excel
//! workbook as a file download.
//!
//! # Example
//!
//! ```no_run
//! use excel_generator::excel::WorkbookExporter;
//! use excel_generator::parser::parse_body;
//!
//! let request = parse_body(br#"{"sheets": {"Sheet1": [["a", 1], ["b", 2]]}}"#)?;
//! let bytes = WorkbookExporter::new(&request).to_buffer()?;
//!
//! println!("{} -> {} bytes", request.resolved_filename(), bytes.len());
//! # Ok::<(), excel_generator::error::ServiceError>(())
//! ```

pub mod api;
pub mod error;
pub mod excel;
pub mod parser;
pub mod types;

// Re-export commonly used types
pub use error::{ServiceError, ServiceResult};
pub use types::{CellValue, Sheet, WorkbookRequest};
