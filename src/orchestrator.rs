//! Workbook-level translation pipeline
//!
//! load → translate sheet names → translate sheets in parallel → write.
//! Per-item translation failures never abort a run; load and write
//! failures do.

use crate::cache::{SharedCache, TranslationStore};
use crate::config::{TranslatorConfig, OUTPUT_PREFIX};
use crate::dispatcher::{DispatchReport, Dispatcher};
use crate::error::{TranslatorError, TranslatorResult};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::sheet::{SheetProcessor, SheetScan};
use crate::translator::Translate;
use crate::types::{is_flagged, Workbook};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{info, warn};

/// Summary of one translation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationReport {
    pub sheets: usize,
    /// Sheet names whose translation succeeded
    pub sheet_names_translated: usize,
    /// All dispatch rounds of the run, merged
    pub dispatch: DispatchReport,
    /// Cache size at the end of the run
    pub cached_entries: usize,
    pub output: Option<PathBuf>,
}

/// Flagged items of a whole workbook, without translating anything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookScan {
    /// Flagged sheet names, in workbook order
    pub sheet_names: Vec<String>,
    pub sheets: Vec<SheetScan>,
}

impl WorkbookScan {
    pub fn of(workbook: &Workbook) -> Self {
        Self {
            sheet_names: workbook
                .sheets
                .iter()
                .filter(|s| is_flagged(&s.name))
                .map(|s| s.name.clone())
                .collect(),
            sheets: workbook.sheets.iter().map(SheetScan::of).collect(),
        }
    }

    /// Every distinct string a run would need translated
    pub fn distinct_items(&self) -> BTreeSet<&str> {
        self.sheet_names
            .iter()
            .map(String::as_str)
            .chain(self.sheets.iter().flat_map(SheetScan::items))
            .collect()
    }
}

/// Output path for `input`: `translated_<stem>.xlsx` in the same directory
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook".to_string());
    let file_name = format!("{}{}.xlsx", OUTPUT_PREFIX, stem);

    match input.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

pub struct WorkbookTranslator {
    config: TranslatorConfig,
    cache: Arc<dyn TranslationStore>,
    translator: Arc<dyn Translate>,
    sheets: Vec<String>,
    runtime: Runtime,
}

impl WorkbookTranslator {
    /// Validates `config` and starts the async runtime used for
    /// translation calls
    pub fn new(config: TranslatorConfig, translator: Arc<dyn Translate>) -> TranslatorResult<Self> {
        config.validate()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("translate-io")
            .build()
            .map_err(|e| TranslatorError::Runtime(format!("Failed to start runtime: {}", e)))?;

        Ok(Self {
            config,
            cache: Arc::new(SharedCache::new()),
            translator,
            sheets: Vec::new(),
            runtime,
        })
    }

    /// Use an existing cache instead of a fresh one
    pub fn with_cache(mut self, cache: Arc<dyn TranslationStore>) -> Self {
        self.cache = cache;
        self
    }

    /// Only translate (and write) the named sheets
    pub fn with_sheets(mut self, sheets: Vec<String>) -> Self {
        self.sheets = sheets;
        self
    }

    pub fn cache(&self) -> &Arc<dyn TranslationStore> {
        &self.cache
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate the workbook at `input` and write the result.
    ///
    /// The output goes to `output` if given, otherwise next to the input
    /// (see [`output_path_for`]).
    pub fn translate_file(
        &self,
        input: &Path,
        output: Option<&Path>,
    ) -> TranslatorResult<TranslationReport> {
        if !input.exists() {
            return Err(TranslatorError::FileNotFound(input.display().to_string()));
        }

        let workbook = ExcelImporter::new(input)
            .with_sheets(self.sheets.clone())
            .import()?;
        info!(
            file = %input.display(),
            sheets = workbook.len(),
            "Loaded workbook"
        );

        let source_names: Vec<String> = workbook.sheets.iter().map(|s| s.name.clone()).collect();
        let (translated, mut report) = self.translate_workbook(workbook)?;

        // Only names that came back from the service may be sanitized or suffixed
        let renamed: Vec<bool> = translated
            .sheets
            .iter()
            .zip(&source_names)
            .map(|(sheet, source)| sheet.name != *source)
            .collect();

        let output_path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| output_path_for(input));
        ExcelExporter::new(translated)
            .with_translated_names(renamed)
            .export(&output_path)?;

        info!(file = %output_path.display(), "Excel file has been translated");
        report.output = Some(output_path);
        Ok(report)
    }

    /// Translate an in-memory workbook; sheet order is preserved
    pub fn translate_workbook(
        &self,
        workbook: Workbook,
    ) -> TranslatorResult<(Workbook, TranslationReport)> {
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&self.translator),
            Arc::clone(&self.cache),
            self.runtime.handle().clone(),
            &self.config,
        ));

        // Sheet names are settled before fan-out so every worker sees them
        let flagged_names: Vec<&str> = workbook
            .sheets
            .iter()
            .map(|s| s.name.as_str())
            .filter(|n| is_flagged(n))
            .collect();
        let missing = self.cache.missing(&flagged_names);

        let mut report = TranslationReport {
            sheets: workbook.len(),
            ..TranslationReport::default()
        };

        if !missing.is_empty() {
            info!(count = missing.len(), "Translating sheet names");
            report.dispatch.merge(dispatcher.dispatch(missing));
        }

        report.sheet_names_translated = flagged_names
            .iter()
            .filter(|n| self.cache.get(n).is_some())
            .count();

        let pairs: Vec<_> = workbook
            .sheets
            .into_iter()
            .map(|sheet| {
                let name = is_flagged(&sheet.name)
                    .then(|| self.cache.get(&sheet.name))
                    .flatten()
                    .unwrap_or_else(|| sheet.name.clone());
                (name, sheet)
            })
            .collect();

        let workers = self.config.worker_count();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("sheet-worker-{}", i))
            .build()
            .map_err(|e| TranslatorError::Runtime(format!("Failed to start sheet workers: {}", e)))?;

        info!(workers, "Creating sheet workers");
        let processor = SheetProcessor::new(dispatcher);
        let results: Vec<_> = pool.install(|| {
            pairs
                .into_par_iter()
                .map(|(name, sheet)| processor.process(name, sheet))
                .collect()
        });

        let mut translated = Workbook::new();
        for (_, sheet, sheet_report) in results {
            report.dispatch.merge(sheet_report);
            translated.add_sheet(sheet);
        }

        if !report.dispatch.is_clean() {
            warn!(
                failed = report.dispatch.failed.len(),
                "Some items were left untranslated"
            );
        }

        report.cached_entries = self.cache.len();
        Ok((translated, report))
    }
}
