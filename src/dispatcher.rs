//! Concurrent dispatch of translation calls
//!
//! One call per distinct string, bounded by a semaphore shared across every
//! caller of the same dispatcher. Successful results go straight into the
//! cache; failures are logged and left out of it.

use crate::cache::TranslationStore;
use crate::config::TranslatorConfig;
use crate::translator::{Translate, TranslationRequest};
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

/// Outcome of one dispatch round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Distinct strings sent to the service
    pub requested: usize,
    /// Calls that produced a translation
    pub translated: usize,
    /// Strings whose call failed, sorted
    pub failed: Vec<String>,
}

impl DispatchReport {
    pub fn merge(&mut self, other: DispatchReport) {
        self.requested += other.requested;
        self.translated += other.translated;
        self.failed.extend(other.failed);
        self.failed.sort();
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Dispatcher {
    translator: Arc<dyn Translate>,
    cache: Arc<dyn TranslationStore>,
    runtime: Handle,
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    source_lang: String,
    target_lang: String,
}

impl Dispatcher {
    pub fn new(
        translator: Arc<dyn Translate>,
        cache: Arc<dyn TranslationStore>,
        runtime: Handle,
        config: &TranslatorConfig,
    ) -> Self {
        let max_concurrent = config.max_concurrent_requests.max(1);
        Self {
            translator,
            cache,
            runtime,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            source_lang: config.effective_source().to_string(),
            target_lang: config.target_lang.clone(),
        }
    }

    pub fn cache(&self) -> &Arc<dyn TranslationStore> {
        &self.cache
    }

    /// Translate `items` and block the calling thread until every call has
    /// returned.
    ///
    /// Must not be called from inside the async runtime; use
    /// [`Dispatcher::dispatch_async`] there.
    pub fn dispatch<I>(&self, items: I) -> DispatchReport
    where
        I: IntoIterator<Item = String>,
    {
        self.runtime.block_on(self.dispatch_async(items))
    }

    pub async fn dispatch_async<I>(&self, items: I) -> DispatchReport
    where
        I: IntoIterator<Item = String>,
    {
        let items: BTreeSet<String> = items.into_iter().collect();
        if items.is_empty() {
            return DispatchReport::default();
        }

        let requested = items.len();
        debug!(count = requested, "Dispatching translation calls");

        let outcomes: Vec<(String, bool)> = stream::iter(items)
            .map(|text| async move {
                // The semaphore is never closed, so acquire cannot fail.
                let _permit = self.permits.acquire().await.ok();
                let translated = self.translate_item(&text).await;
                (text, translated)
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let mut failed: Vec<String> = outcomes
            .into_iter()
            .filter_map(|(text, ok)| (!ok).then_some(text))
            .collect();
        failed.sort();

        DispatchReport {
            requested,
            translated: requested - failed.len(),
            failed,
        }
    }

    async fn translate_item(&self, text: &str) -> bool {
        let request = TranslationRequest::new(text, &self.source_lang, &self.target_lang);

        match self.translator.translate_one(&request).await {
            Ok(translated) => {
                self.cache.put(text.to_string(), translated);
                true
            }
            Err(e) => {
                error!(error = %e, "Translation call failed");
                warn!(text = %text, "Failed to translate item");
                false
            }
        }
    }
}
