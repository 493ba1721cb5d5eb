//! Run configuration
//!
//! Values come from an optional YAML file and are then overridden by CLI
//! flags (which themselves fall back to `XLSX_TRANSLATOR_*` env vars).

use crate::error::{TranslatorError, TranslatorResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default cap on in-flight translation calls
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 500;

/// Default LibreTranslate-compatible endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/translate";

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Prefix added to the input file name to build the output file name
pub const OUTPUT_PREFIX: &str = "translated_";

/// Source language code sent when none is configured
pub const AUTO_DETECT: &str = "auto";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Source language code; empty means auto-detect
    pub source_lang: String,
    /// Target language code; required
    pub target_lang: String,
    /// Translation service URL
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Cap on concurrent translation calls
    pub max_concurrent_requests: usize,
    /// Sheet worker count; 0 means one per CPU
    pub workers: usize,
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            source_lang: String::new(),
            target_lang: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            workers: 0,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl TranslatorConfig {
    pub fn new(source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            ..Self::default()
        }
    }

    /// Load a YAML config file
    pub fn load(path: &Path) -> TranslatorResult<Self> {
        if !path.exists() {
            return Err(TranslatorError::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let config: TranslatorConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Reject configurations the translation service cannot work with
    pub fn validate(&self) -> TranslatorResult<()> {
        if self.target_lang.trim().is_empty() {
            return Err(TranslatorError::Config(
                "target language is required (use --target)".to_string(),
            ));
        }
        if self.endpoint.trim().is_empty() {
            return Err(TranslatorError::Config(
                "translation endpoint must not be empty".to_string(),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(TranslatorError::Config(
                "max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(TranslatorError::Config(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Source code as sent on the wire
    pub fn effective_source(&self) -> &str {
        let source = self.source_lang.trim();
        if source.is_empty() {
            AUTO_DETECT
        } else {
            source
        }
    }

    /// Resolved sheet worker count
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
