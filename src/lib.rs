//! xlsx-translator - translate the non-English text of a spreadsheet workbook
//!
//! Cells, column headers and sheet names that contain non-ASCII characters
//! are sent to a remote translation service and written to a new workbook.
//! Every distinct string is translated at most once per run: a shared cache
//! sits in front of the service, translation calls run concurrently under a
//! cap, and sheets are processed in parallel.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use xlsx_translator::{HttpTranslator, TranslatorConfig, WorkbookTranslator};
//!
//! let config = TranslatorConfig::new("ja", "en");
//! let translator = Arc::new(HttpTranslator::new(&config)?);
//! let runner = WorkbookTranslator::new(config, translator)?;
//!
//! let report = runner.translate_file(Path::new("sales.xlsx"), None)?;
//! println!("Translated {} strings", report.dispatch.translated);
//! # Ok::<(), xlsx_translator::TranslatorError>(())
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod excel;
pub mod orchestrator;
pub mod sheet;
pub mod translator;
pub mod types;

// Re-export commonly used types
pub use cache::{SharedCache, TranslationStore};
pub use config::TranslatorConfig;
pub use dispatcher::{DispatchReport, Dispatcher};
pub use error::{TranslatorError, TranslatorResult};
pub use orchestrator::{TranslationReport, WorkbookScan, WorkbookTranslator};
pub use sheet::{SheetProcessor, SheetScan};
pub use translator::{HttpTranslator, Translate, TranslationRequest};
pub use types::{CellValue, Sheet, Workbook};
