//! Per-sheet translation
//!
//! Scans one sheet for flagged headers and cells, makes sure the cache holds
//! whatever is missing, then rebuilds the sheet from cache lookups.

use crate::cache::TranslationStore;
use crate::dispatcher::{DispatchReport, Dispatcher};
use crate::types::{CellValue, Sheet};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Flagged items found in one sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetScan {
    pub name: String,
    /// Flagged headers, in column order
    pub headers: Vec<String>,
    /// Distinct flagged cell values
    pub cells: BTreeSet<String>,
    /// Number of flagged cells, duplicates included
    pub flagged_cells: usize,
}

impl SheetScan {
    pub fn of(sheet: &Sheet) -> Self {
        let mask = sheet.flagged_mask();
        Self {
            name: sheet.name.clone(),
            headers: sheet
                .flagged_headers()
                .into_iter()
                .map(str::to_string)
                .collect(),
            cells: sheet
                .distinct_flagged_cells()
                .into_iter()
                .map(str::to_string)
                .collect(),
            flagged_cells: mask.iter().flatten().filter(|f| **f).count(),
        }
    }

    /// Distinct flagged cells unioned with flagged headers
    pub fn items(&self) -> BTreeSet<&str> {
        self.cells
            .iter()
            .map(String::as_str)
            .chain(self.headers.iter().map(String::as_str))
            .collect()
    }
}

/// Translates one sheet at a time against a shared cache
pub struct SheetProcessor {
    dispatcher: Arc<Dispatcher>,
}

impl SheetProcessor {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    fn cache(&self) -> &Arc<dyn TranslationStore> {
        self.dispatcher.cache()
    }

    /// Translate `sheet` and return it under `name`.
    ///
    /// Blocks while missing strings are dispatched. Untranslated items keep
    /// their original text.
    pub fn process(&self, name: String, sheet: Sheet) -> (String, Sheet, DispatchReport) {
        let scan = SheetScan::of(&sheet);
        let items: Vec<&str> = scan.items().into_iter().collect();
        let missing = self.cache().missing(&items);

        debug!(
            sheet = %name,
            flagged = items.len(),
            missing = missing.len(),
            "Scanned sheet"
        );

        let report = self.dispatcher.dispatch(missing);
        let translated = rewrite(name.clone(), sheet, self.cache().as_ref());

        (name, translated, report)
    }
}

/// Rebuild `sheet` from cache lookups, keeping originals on a miss
pub fn rewrite(name: String, sheet: Sheet, cache: &dyn TranslationStore) -> Sheet {
    let lookup = |cell: CellValue| match cell {
        CellValue::Text(text) if crate::types::is_flagged(&text) => {
            CellValue::Text(cache.get(&text).unwrap_or(text))
        }
        other => other,
    };

    Sheet {
        name,
        headers: sheet.headers.into_iter().map(lookup).collect(),
        rows: sheet
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(lookup).collect())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SharedCache;

    #[test]
    fn test_scan_collects_headers_and_cells() {
        let sheet = Sheet::new("s")
            .with_headers(["nombre", "año"])
            .with_row(["José", "1990"])
            .with_row(["José", "año"]);

        let scan = SheetScan::of(&sheet);
        assert_eq!(scan.headers, vec!["año".to_string()]);
        assert_eq!(scan.cells.len(), 2);
        assert_eq!(scan.flagged_cells, 3);

        let items: Vec<&str> = scan.items().into_iter().collect();
        assert_eq!(items, vec!["José", "año"]);
    }

    #[test]
    fn test_rewrite_uses_cache_and_keeps_misses() {
        let cache = SharedCache::with_entries([("café", "coffee shop"), ("año", "year")]);
        let sheet = Sheet::new("s")
            .with_headers(["año", "précio", "id"])
            .with_row(vec![
                CellValue::from("café"),
                CellValue::from("crème"),
                CellValue::Number(7.0),
            ])
            .with_row(vec![CellValue::Empty, CellValue::from("plain")]);

        let out = rewrite("out".to_string(), sheet, &cache);

        assert_eq!(out.name, "out");
        assert_eq!(
            out.headers,
            vec![
                CellValue::from("year"),
                CellValue::from("précio"),
                CellValue::from("id")
            ]
        );
        assert_eq!(
            out.rows[0],
            vec![
                CellValue::from("coffee shop"),
                CellValue::from("crème"),
                CellValue::Number(7.0)
            ]
        );
        assert_eq!(out.rows[1], vec![CellValue::Empty, CellValue::from("plain")]);
    }

    #[test]
    fn test_rewrite_ignores_cached_ascii() {
        // ASCII text is never looked up, even if the cache happens to hold it
        let cache = SharedCache::with_entries([("plain", "PLAIN")]);
        let sheet = Sheet::new("s").with_row(["plain"]);
        let out = rewrite("s".to_string(), sheet, &cache);
        assert_eq!(out.rows[0], vec![CellValue::from("plain")]);
    }
}
