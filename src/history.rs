/// One-shot import of recently visited domains from browser history

use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;

use crate::domain::trackable_domain;
use crate::recent::{DomainRecord, Tracker};
use crate::storage::KeyValueStore;

// Import JS bridge functions
#[wasm_bindgen(module = "/newtab.js")]
extern "C" {
    fn historyAvailable() -> bool;

    #[wasm_bindgen(catch)]
    async fn searchHistory(start_time: f64, max_results: u32) -> Result<JsValue, JsValue>;
}

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// How far back and how many raw entries to ask the provider for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    pub lookback_ms: i64,
    pub max_results: u32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            lookback_ms: 7 * DAY_MS,
            max_results: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub text: String,
    /// Milliseconds since the epoch
    pub start_time: i64,
    pub max_results: u32,
}

impl HistoryQuery {
    pub fn recent(options: &ImportOptions, now: i64) -> HistoryQuery {
        HistoryQuery {
            text: String::new(),
            start_time: now.saturating_sub(options.lookback_ms),
            max_results: options.max_results,
        }
    }
}

/// A visited page as reported by the history provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub last_visit_time: Option<f64>,
}

impl HistoryEntry {
    pub fn new(url: &str, last_visit_time: f64) -> HistoryEntry {
        HistoryEntry {
            url: Some(url.to_string()),
            last_visit_time: Some(last_visit_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    #[error("history API is not available")]
    Unavailable,
    #[error("history query failed: {0}")]
    Query(String),
    #[error("failed to decode history results: {0}")]
    Decode(String),
}

/// Source of recently visited pages
#[allow(async_fn_in_trait)]
pub trait HistoryProvider {
    async fn search(&self, query: &HistoryQuery) -> Result<Vec<HistoryEntry>, HistoryError>;
}

/// `chrome.history`, reached through the JS bridge
pub struct ChromeHistory;

impl ChromeHistory {
    /// None when the page runs without the history permission
    pub fn detect() -> Option<ChromeHistory> {
        if historyAvailable() {
            Some(ChromeHistory)
        } else {
            None
        }
    }
}

impl HistoryProvider for ChromeHistory {
    async fn search(&self, query: &HistoryQuery) -> Result<Vec<HistoryEntry>, HistoryError> {
        let results_js = searchHistory(query.start_time as f64, query.max_results)
            .await
            .map_err(|e| HistoryError::Query(format!("{:?}", e)))?;

        if results_js.is_null() || results_js.is_undefined() {
            return Ok(Vec::new());
        }

        serde_wasm_bindgen::from_value(results_js).map_err(|e| HistoryError::Decode(format!("{:?}", e)))
    }
}

/// Reduce raw history to one record per domain, newest first.
///
/// The latest visit wins for each domain. Entries without a recordable domain
/// are dropped; ties on timestamp are ordered by domain name.
pub fn reduce_history(entries: &[HistoryEntry]) -> Vec<DomainRecord> {
    let latest: HashMap<String, i64> = entries
        .iter()
        .filter_map(|entry| {
            let domain = trackable_domain(entry.url.as_deref()?)?;
            let visited = entry.last_visit_time.unwrap_or(0.0) as i64;
            Some((domain, visited))
        })
        .fold(HashMap::new(), |mut latest, (domain, visited)| {
            let slot = latest.entry(domain).or_insert(visited);
            *slot = (*slot).max(visited);
            latest
        });

    let mut records: Vec<DomainRecord> = latest
        .iter()
        .map(|(domain, visited)| DomainRecord::new(domain, *visited))
        .collect();

    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.domain.cmp(&b.domain)));

    records
}

/// What an import run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The list was already full
    Skipped,
    /// No history provider on this page
    Unavailable,
    /// The provider failed; nothing was imported
    Failed,
    /// The provider answered with nothing usable
    Empty,
    /// This many records were appended
    Merged(usize),
}

/// Fill free slots in the tracker from browser history.
///
/// The tracker is only borrowed around the synchronous steps. The merge
/// re-reads current state after the provider answers, so visits recorded
/// while the query was pending keep their place ahead of imported domains.
/// Callers redraw afterwards whatever the outcome.
pub async fn import_from_history<S, P>(
    tracker: &RefCell<Tracker<S>>,
    provider: Option<&P>,
    options: &ImportOptions,
    now: i64,
) -> ImportOutcome
where
    S: KeyValueStore,
    P: HistoryProvider,
{
    if tracker.borrow_mut().is_full() {
        debug!("Recent domains full, skipping history import");
        return ImportOutcome::Skipped;
    }

    let Some(provider) = provider else {
        info!("History API unavailable, skipping import");
        return ImportOutcome::Unavailable;
    };

    let query = HistoryQuery::recent(options, now);
    let entries = match provider.search(&query).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("{}", e);
            return ImportOutcome::Failed;
        }
    };

    let candidates = reduce_history(&entries);
    if candidates.is_empty() {
        debug!("No history to import");
        return ImportOutcome::Empty;
    }

    let appended = tracker.borrow_mut().merge_external(&candidates);
    debug!("Imported {} domains from {} history entries", appended, entries.len());
    ImportOutcome::Merged(appended)
}
