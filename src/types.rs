use std::collections::BTreeSet;

//==============================================================================
// Flagged Items
//==============================================================================

/// Returns true when `text` contains at least one non-ASCII character.
///
/// Flagged strings are the only ones ever sent to the translation service.
pub fn is_flagged(text: &str) -> bool {
    !text.is_ascii()
}

//==============================================================================
// Cells
//==============================================================================

/// A single typed worksheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
    /// Excel serial date/time (days since 1899-12-30)
    DateTime(f64),
    /// Formula error such as `#DIV/0!`, kept verbatim
    Error(String),
}

impl CellValue {
    /// Text content of the cell, if it holds text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Text content of the cell if it is a flagged item
    pub fn flagged_text(&self) -> Option<&str> {
        self.as_text().filter(|s| is_flagged(s))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

//==============================================================================
// Sheets
//==============================================================================

/// One worksheet: a header row plus a grid of data rows.
///
/// Rows may be ragged; writers emit whatever cells each row holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<CellValue>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Builder-style header setter
    pub fn with_headers<I, C>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style row append
    pub fn with_row<I, C>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row (header included)
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Cell at (row, col) of the data grid, if present
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Headers that are flagged items
    pub fn flagged_headers(&self) -> Vec<&str> {
        self.headers
            .iter()
            .filter_map(CellValue::flagged_text)
            .collect()
    }

    /// Boolean mask aligned with `rows`: true where the cell is flagged text
    pub fn flagged_mask(&self) -> Vec<Vec<bool>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.flagged_text().is_some()).collect())
            .collect()
    }

    /// Distinct flagged cell values (headers excluded)
    pub fn distinct_flagged_cells(&self) -> BTreeSet<&str> {
        self.rows
            .iter()
            .flatten()
            .filter_map(CellValue::flagged_text)
            .collect()
    }
}

//==============================================================================
// Workbooks
//==============================================================================

/// An in-memory workbook; sheet order is the order of `sheets`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
