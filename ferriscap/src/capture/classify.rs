//! Command classification for capture chunks.

use regex::Regex;

use super::chunk::Chunk;
use super::patterns::keyword_alternation;
use crate::dialect::{CommandKeyword, Dialect};

/// Longest diagnostics key kept for opaque labels.
const MAX_LABEL_CHARS: usize = 80;

/// Normalize a label for use as a diagnostics key.
///
/// Lowercases, collapses whitespace runs and truncates long opaque labels.
pub fn normalize_label(label: &str) -> String {
    let collapsed = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    collapsed.chars().take(MAX_LABEL_CHARS).collect()
}

/// Result of classifying a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Canonical label.
    pub label: String,

    /// The command text as typed, prompt removed.
    pub command: Option<String>,

    /// Index of the line holding the command, if any.
    pub command_line: Option<usize>,
}

/// Derives a canonical command label from a chunk's leading lines.
#[derive(Debug, Clone)]
pub struct Classifier {
    dialect: Dialect,
    command_line: Regex,
}

impl Classifier {
    /// Create a classifier for a dialect.
    pub fn new(dialect: &Dialect) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"(?i)^\s*(?P<keyword>{})(?P<rest>\s+.*)?$",
            keyword_alternation(&dialect.command_keywords)
        );
        Ok(Self {
            dialect: dialect.clone(),
            command_line: Regex::new(&pattern)?,
        })
    }

    /// Strip a leading prompt from a line.
    fn strip_prompt<'a>(&self, line: &'a str) -> &'a str {
        match self.dialect.prompt_end(line) {
            Some(end) => &line[end..],
            None => line,
        }
    }

    /// Full keyword for an abbreviation typed on the CLI.
    fn expand_keyword(&self, typed: &str) -> String {
        let typed = typed.to_lowercase();
        self.dialect
            .command_keywords
            .iter()
            .find(|kw: &&CommandKeyword| {
                typed.len() >= kw.min_len && kw.word.starts_with(typed.as_str())
            })
            .map(|kw| kw.word.clone())
            .unwrap_or(typed)
    }

    /// Check if a line is a command (optionally behind a prompt).
    pub fn is_command_line(&self, line: &str) -> bool {
        self.command_line.is_match(self.strip_prompt(line))
    }

    /// Classify chunk text.
    ///
    /// The first non-trivial line that matches a command keyword wins.
    /// Without one, the first non-trivial line is used verbatim.
    pub fn classify(&self, text: &str) -> Classification {
        let mut fallback: Option<&str> = None;

        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty()
                || self.dialect.is_bare_prompt(line)
                || self.dialect.is_system_message(line)
            {
                continue;
            }

            let stripped = self.strip_prompt(line);
            if let Some(caps) = self.command_line.captures(stripped) {
                let keyword = self.expand_keyword(&caps["keyword"]);
                let rest = caps.name("rest").map(|m| m.as_str()).unwrap_or("");
                let label = normalize_label(&format!("{keyword} {rest}"));
                return Classification {
                    label,
                    command: Some(stripped.trim().to_string()),
                    command_line: Some(idx),
                };
            }

            fallback.get_or_insert(trimmed);
        }

        let label = fallback
            .or_else(|| text.lines().map(str::trim).find(|l| !l.is_empty()))
            .unwrap_or_default()
            .to_string();

        Classification {
            label,
            command: None,
            command_line: None,
        }
    }

    /// Classify a segmented chunk and build its body.
    pub fn chunk(&self, index: usize, text: &str) -> Chunk {
        let classification = self.classify(text);

        let mut lines: Vec<&str> = match classification.command_line {
            Some(idx) => text.lines().skip(idx + 1).collect(),
            None => text.lines().collect(),
        };

        // Trailing prompts belong to the next command
        while lines
            .last()
            .is_some_and(|l| l.trim().is_empty() || self.dialect.is_bare_prompt(l))
        {
            lines.pop();
        }

        Chunk {
            index,
            label: classification.label,
            command: classification.command,
            body: lines.join("\n"),
            raw: text.to_string(),
        }
    }
}
