//! Diagnostics bucket for unrecognized and failed chunks.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One chunk that was not turned into fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSection {
    /// Chunk text as captured.
    pub raw: String,

    /// Extractor error, `None` when the command was simply not recognized.
    pub error: Option<String>,
}

/// Raw sections keyed by normalized command label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    sections: IndexMap<String, Vec<RawSection>>,
}

impl Diagnostics {
    /// Create an empty bucket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a chunk no extractor claimed.
    pub fn record_unmatched(&mut self, key: impl Into<String>, raw: impl Into<String>) {
        self.push(key, RawSection {
            raw: raw.into(),
            error: None,
        });
    }

    /// Record a chunk whose extractor failed.
    pub fn record_failure(
        &mut self,
        key: impl Into<String>,
        raw: impl Into<String>,
        error: impl Into<String>,
    ) {
        self.push(key, RawSection {
            raw: raw.into(),
            error: Some(error.into()),
        });
    }

    fn push(&mut self, key: impl Into<String>, section: RawSection) {
        self.sections.entry(key.into()).or_default().push(section);
    }

    /// Entries recorded under a label.
    pub fn get(&self, key: &str) -> Option<&[RawSection]> {
        self.sections.get(key).map(Vec::as_slice)
    }

    /// Check if any entry exists under a label.
    pub fn contains(&self, key: &str) -> bool {
        self.sections.contains_key(key)
    }

    /// Iterate labels in first-recorded order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.sections.keys()
    }

    /// Total number of recorded chunks.
    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of recorded chunks carrying an error.
    pub fn failure_count(&self) -> usize {
        self.sections
            .values()
            .flatten()
            .filter(|s| s.error.is_some())
            .count()
    }
}
