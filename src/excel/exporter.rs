//! Excel exporter implementation - in-memory `Workbook` → .xlsx

use crate::error::{TranslatorError, TranslatorResult};
use crate::types::{CellValue, Sheet, Workbook};
use rust_xlsxwriter::{Format, Formula, Workbook as XlsxWorkbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;

/// Longest sheet name Excel accepts
pub const MAX_SHEET_NAME_CHARS: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Error values written as a formula whose cached result is the error itself
const ERROR_FORMULAS: [(&str, &str); 7] = [
    ("#DIV/0!", "=1/0"),
    ("#N/A", "=NA()"),
    ("#VALUE!", "=\"text\"+1"),
    ("#NUM!", "=SQRT(-1)"),
    ("#REF!", "=#REF!"),
    ("#NAME?", "=#NAME?"),
    ("#NULL!", "=#NULL!"),
];

/// Writes a `Workbook` to .xlsx, one worksheet per sheet, in order
pub struct ExcelExporter {
    workbook: Workbook,
    translated: Vec<bool>,
}

impl ExcelExporter {
    /// Create a new Excel exporter
    pub fn new(workbook: Workbook) -> Self {
        Self {
            workbook,
            translated: Vec::new(),
        }
    }

    /// Mark which sheet names came from the translation service.
    ///
    /// Unmarked names are written unchanged when Excel accepts them and
    /// win any collision with a translated name.
    pub fn with_translated_names(mut self, translated: Vec<bool>) -> Self {
        self.translated = translated;
        self
    }

    /// Export the workbook to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> TranslatorResult<()> {
        let mut xlsx = XlsxWorkbook::new();
        let date_format = Format::new().set_num_format(DATE_TIME_FORMAT);

        let names: Vec<&str> = self.workbook.sheet_names();
        let safe_names = sanitize_sheet_names(&names, &self.translated);

        for (sheet, name) in self.workbook.sheets.iter().zip(&safe_names) {
            let worksheet = xlsx.add_worksheet();
            worksheet.set_name(name).map_err(|e| {
                TranslatorError::Export(format!("Failed to set worksheet name '{}': {}", name, e))
            })?;
            Self::export_sheet(worksheet, sheet, &date_format)?;
        }

        xlsx.save(output_path)
            .map_err(|e| TranslatorError::Export(format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }

    /// Header row goes to row 0, data rows follow
    fn export_sheet(
        worksheet: &mut Worksheet,
        sheet: &Sheet,
        date_format: &Format,
    ) -> TranslatorResult<()> {
        let rows = std::iter::once(&sheet.headers).chain(sheet.rows.iter());

        for (row_idx, row) in rows.enumerate() {
            let excel_row = u32::try_from(row_idx)
                .map_err(|_| TranslatorError::Export("Too many rows".to_string()))?;

            for (col_idx, cell) in row.iter().enumerate() {
                let excel_col = u16::try_from(col_idx)
                    .map_err(|_| TranslatorError::Export("Too many columns".to_string()))?;
                Self::write_cell(worksheet, excel_row, excel_col, cell, date_format)?;
            }
        }

        Ok(())
    }

    fn write_cell(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &CellValue,
        date_format: &Format,
    ) -> TranslatorResult<()> {
        let result = match cell {
            CellValue::Empty => return Ok(()),
            CellValue::Text(s) if s.is_empty() => return Ok(()),
            CellValue::Text(s) => worksheet.write_string(row, col, s),
            CellValue::Error(e) => {
                match ERROR_FORMULAS.iter().find(|(err, _)| *err == e.as_str()) {
                    Some((err, formula)) => {
                        worksheet.write_formula(row, col, Formula::new(*formula).set_result(*err))
                    }
                    None => worksheet.write_string(row, col, e),
                }
            }
            CellValue::Number(n) => worksheet.write_number(row, col, *n),
            CellValue::Boolean(b) => worksheet.write_boolean(row, col, *b),
            CellValue::DateTime(serial) => {
                worksheet.write_number_with_format(row, col, *serial, date_format)
            }
        };

        result
            .map(|_| ())
            .map_err(|e| TranslatorError::Export(format!("Failed to write cell: {}", e)))
    }
}

/// Make one sheet name acceptable to Excel.
///
/// Forbidden characters become `_`, surrounding apostrophes and whitespace are
/// stripped, and the result is cut to 31 characters. Blank names become
/// `Sheet`.
pub fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if FORBIDDEN_SHEET_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim().trim_matches('\'').trim();
    let truncated: String = trimmed.chars().take(MAX_SHEET_NAME_CHARS).collect();
    let truncated = truncated.trim_end().trim_end_matches('\'');

    if truncated.is_empty() || truncated.eq_ignore_ascii_case("history") {
        "Sheet".to_string()
    } else {
        truncated.to_string()
    }
}

/// Whether Excel accepts `name` as it is
pub fn is_valid_sheet_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_SHEET_NAME_CHARS
        && !name.contains(&FORBIDDEN_SHEET_CHARS[..])
        && !name.starts_with('\'')
        && !name.ends_with('\'')
        && !name.eq_ignore_ascii_case("history")
}

/// Resolve the final sheet names, in order.
///
/// Names not marked in `translated` are reserved first and kept verbatim
/// when valid. Translated names (and invalid or clashing originals) are
/// sanitized, and case-insensitive collisions get ` (2)`, ` (3)`, ...
/// suffixes.
pub fn sanitize_sheet_names(names: &[&str], translated: &[bool]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();

    let kept: Vec<Option<String>> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let is_translated = translated.get(i).copied().unwrap_or(false);
            (!is_translated && is_valid_sheet_name(name) && taken.insert(name.to_lowercase()))
                .then(|| name.to_string())
        })
        .collect();

    kept.into_iter()
        .zip(names)
        .map(|(kept, name)| kept.unwrap_or_else(|| unique_name(name, &mut taken)))
        .collect()
}

fn unique_name(name: &str, taken: &mut HashSet<String>) -> String {
    let base = sanitize_sheet_name(name);
    let mut candidate = base.clone();
    let mut n = 2;

    while !taken.insert(candidate.to_lowercase()) {
        let suffix = format!(" ({})", n);
        let keep = MAX_SHEET_NAME_CHARS - suffix.chars().count();
        let stem: String = base.chars().take(keep).collect();
        candidate = format!("{}{}", stem.trim_end(), suffix);
        n += 1;
    }

    candidate
}
