use crate::config::TranslatorConfig;
use crate::error::{TranslatorError, TranslatorResult};
use crate::excel::ExcelImporter;
use crate::orchestrator::{output_path_for, TranslationReport, WorkbookScan, WorkbookTranslator};
use crate::translator::{HttpTranslator, Translate};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

/// Flags of the translate command; `None` leaves the config file value
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    pub source: Option<String>,
    pub target: Option<String>,
    pub output: Option<PathBuf>,
    pub sheets: Vec<String>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub max_concurrent: Option<usize>,
    pub workers: Option<usize>,
    pub timeout: Option<u64>,
    pub config: Option<PathBuf>,
}

impl TranslateOptions {
    /// Config file (or defaults) with flags layered on top
    pub fn resolve_config(&self) -> TranslatorResult<TranslatorConfig> {
        let mut config = match &self.config {
            Some(path) => TranslatorConfig::load(path)?,
            None => TranslatorConfig::default(),
        };

        if let Some(source) = &self.source {
            config.source_lang = source.clone();
        }
        if let Some(target) = &self.target {
            config.target_lang = target.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(max) = self.max_concurrent {
            config.max_concurrent_requests = max;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Execute the translate command against the configured HTTP service
pub fn translate(
    input: PathBuf,
    options: TranslateOptions,
    verbose: bool,
) -> TranslatorResult<TranslationReport> {
    let config = options.resolve_config()?;
    let translator = HttpTranslator::new(&config)?;
    translate_with(input, options, config, Arc::new(translator), verbose)
}

/// Execute the translate command with any `Translate` implementation
pub fn translate_with(
    input: PathBuf,
    options: TranslateOptions,
    config: TranslatorConfig,
    translator: Arc<dyn Translate>,
    verbose: bool,
) -> TranslatorResult<TranslationReport> {
    println!("{}", "🌐 Workbook Translation".bold().green());
    println!("   Input:  {}", input.display());

    if !input.exists() {
        return Err(TranslatorError::FileNotFound(input.display().to_string()));
    }

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| output_path_for(&input));
    println!("   Output: {}", output.display());
    println!(
        "   Languages: {} → {}\n",
        config.effective_source().bright_blue(),
        config.target_lang.bright_blue()
    );

    if verbose {
        println!(
            "{}",
            format!(
                "📡 {} (up to {} concurrent calls, {} sheet workers)",
                config.endpoint,
                config.max_concurrent_requests,
                config.worker_count()
            )
            .cyan()
        );
    }

    let runner = WorkbookTranslator::new(config, translator)?.with_sheets(options.sheets);
    let report = runner.translate_file(&input, Some(&output))?;

    println!("{}", "✅ Translation Complete!".bold().green());
    println!("   Sheets:      {}", report.sheets);
    println!("   Requested:   {}", report.dispatch.requested);
    println!("   Translated:  {}", report.dispatch.translated);

    if report.dispatch.is_clean() {
        println!("   Failed:      0\n");
    } else {
        println!(
            "   Failed:      {}",
            report.dispatch.failed.len().to_string().yellow().bold()
        );
        if verbose {
            for item in &report.dispatch.failed {
                println!("      {} {}", "⚠".yellow(), item);
            }
        }
        println!(
            "{}",
            "   Untranslated items were kept in their original language.\n".yellow()
        );
    }

    Ok(report)
}

/// Execute the scan command: list what a translation run would send
pub fn scan(input: PathBuf, sheets: Vec<String>, verbose: bool) -> TranslatorResult<WorkbookScan> {
    println!("{}", "🔎 Workbook Scan".bold().green());
    println!("   File: {}\n", input.display());
    println!(
        "{}",
        "📋 DRY RUN MODE - Nothing will be translated\n".yellow()
    );

    let workbook = ExcelImporter::new(&input).with_sheets(sheets).import()?;
    let scan = WorkbookScan::of(&workbook);

    for sheet in &scan.sheets {
        let marker = if scan.sheet_names.contains(&sheet.name) {
            " (name flagged)".yellow().to_string()
        } else {
            String::new()
        };
        println!("   📊 Sheet: {}{}", sheet.name.bright_blue(), marker);
        println!(
            "      {} flagged headers, {} flagged cells ({} distinct)",
            sheet.headers.len(),
            sheet.flagged_cells,
            sheet.cells.len()
        );

        if verbose {
            for header in &sheet.headers {
                println!("      header: {}", header);
            }
            for cell in &sheet.cells {
                println!("      cell:   {}", cell);
            }
        }
    }

    println!();
    println!(
        "{} {}",
        "Distinct strings to translate:".bold(),
        scan.distinct_items().len()
    );

    Ok(scan)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
