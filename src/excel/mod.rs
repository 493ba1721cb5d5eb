//! Excel import/export
//!
//! - Import: .xlsx/.xlsm/.xlsb/.xls/.ods → `Workbook` (calamine)
//! - Export: `Workbook` → .xlsx (rust_xlsxwriter)

mod exporter;
mod importer;

pub use exporter::{
    is_valid_sheet_name, sanitize_sheet_name, sanitize_sheet_names, ExcelExporter,
    MAX_SHEET_NAME_CHARS,
};
pub use importer::ExcelImporter;
