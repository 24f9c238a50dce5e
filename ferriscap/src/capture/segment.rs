//! Block segmentation of raw captures.
//!
//! Scripted captures separate commands with a literal delimiter line, which
//! is the reliable path. Hand-saved terminal logs have no delimiter, so the
//! segmenter falls back to splitting before prompted command lines and
//! before lines that begin with a command keyword.

use memchr::memmem;
use regex::Regex;

use super::patterns::keyword_alternation;
use crate::dialect::Dialect;

/// Splits capture text into ordered command-scoped chunks.
#[derive(Debug, Clone)]
pub struct Segmenter {
    dialect: Dialect,
    delimiter: String,
    command_start: Regex,
}

impl Segmenter {
    /// Create a segmenter for a dialect.
    pub fn new(dialect: &Dialect) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"(?i)^{}(?:\s+\S|\s*$)",
            keyword_alternation(&dialect.command_keywords)
        );
        Ok(Self {
            dialect: dialect.clone(),
            delimiter: dialect.section_delimiter.clone(),
            command_start: Regex::new(&pattern)?,
        })
    }

    /// Check if the text carries the literal section delimiter.
    pub fn has_delimiter(&self, text: &str) -> bool {
        !self.delimiter.is_empty()
            && memmem::find(text.as_bytes(), self.delimiter.as_bytes()).is_some()
    }

    /// Check if a line begins a new chunk in heuristic mode.
    fn starts_chunk(&self, line: &str) -> bool {
        if let Some(end) = self.dialect.prompt_end(line) {
            // Bare prompts never start a chunk
            return !line[end..].trim().is_empty();
        }
        self.command_start.is_match(line)
    }

    /// Split text into trimmed, non-empty chunks in original order.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chunks = if self.has_delimiter(text) {
            text.split(self.delimiter.as_str())
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect()
        } else {
            self.split_heuristic(text)
        };

        if chunks.is_empty() && !text.trim().is_empty() {
            return vec![text.trim().to_string()];
        }
        chunks
    }

    fn split_heuristic(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            if self.starts_chunk(line) && current.iter().any(|l| !l.trim().is_empty()) {
                push_chunk(&mut chunks, &current);
                current.clear();
            }
            current.push(line);
        }
        push_chunk(&mut chunks, &current);

        chunks
    }
}

fn push_chunk(chunks: &mut Vec<String>, lines: &[&str]) {
    let chunk = lines.join("\n");
    let chunk = chunk.trim();
    if !chunk.is_empty() {
        chunks.push(chunk.to_string());
    }
}
