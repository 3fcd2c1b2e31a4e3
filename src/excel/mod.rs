//! Excel export
//!
//! Serializes validated sheets into an .xlsx buffer with `rust_xlsxwriter`.

mod exporter;

pub use exporter::{WorkbookExporter, XLSX_CONTENT_TYPE};
