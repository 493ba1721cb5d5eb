//! Excel importer implementation - workbook file → in-memory `Workbook`

use crate::error::{TranslatorError, TranslatorResult};
use crate::types::{CellValue, Sheet, Workbook};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};

/// Loads every (or a chosen subset of) worksheet of an Excel/ODS file
pub struct ExcelImporter {
    path: PathBuf,
    only: Vec<String>,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            only: Vec::new(),
        }
    }

    /// Restrict the import to the named sheets (kept in workbook order)
    pub fn with_sheets(mut self, names: Vec<String>) -> Self {
        self.only = names;
        self
    }

    /// Import the workbook fully into memory
    pub fn import(&self) -> TranslatorResult<Workbook> {
        if !self.path.exists() {
            return Err(TranslatorError::FileNotFound(
                self.path.display().to_string(),
            ));
        }

        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            TranslatorError::Import(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        let sheet_names = workbook.sheet_names().to_vec();

        if let Some(unknown) = self.only.iter().find(|n| !sheet_names.contains(n)) {
            return Err(TranslatorError::Config(format!(
                "sheet '{}' not found (available: {})",
                unknown,
                sheet_names.join(", ")
            )));
        }

        let mut result = Workbook::new();
        for sheet_name in sheet_names {
            if !self.only.is_empty() && !self.only.contains(&sheet_name) {
                continue;
            }

            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                TranslatorError::Import(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;

            result.add_sheet(Self::convert_sheet(&sheet_name, &range));
        }

        Ok(result)
    }

    /// First row of the used range becomes the header row
    fn convert_sheet(sheet_name: &str, range: &Range<Data>) -> Sheet {
        let mut rows = range
            .rows()
            .map(|row| row.iter().map(Self::convert_cell).collect::<Vec<_>>());

        let headers = rows.next().unwrap_or_default();

        Sheet {
            name: sheet_name.to_string(),
            headers,
            rows: rows.collect(),
        }
    }

    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Boolean(*b),
            Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }
}
