//! Remote translation
//!
//! `Translate` is the single-call capability the dispatcher drives.
//! `HttpTranslator` talks to a LibreTranslate-compatible service.

mod client;

pub use client::HttpTranslator;

use crate::error::TranslatorResult;
use async_trait::async_trait;

/// One text to translate, with its language pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }
}

/// A remote translation capability.
///
/// Implementations perform exactly one attempt per call; an `Err` is final
/// for that text in the current run.
#[async_trait]
pub trait Translate: Send + Sync {
    async fn translate_one(&self, request: &TranslationRequest) -> TranslatorResult<String>;
}
