//! Chunk type for one command-scoped slice of a capture.

use super::classify::normalize_label;

/// A contiguous slice of a capture believed to hold one command's output.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Position of the chunk in the capture.
    pub index: usize,

    /// Canonical command label, or the first meaningful line for
    /// chunks that do not start with a command.
    pub label: String,

    /// The command line as typed (prompt removed), if one was found.
    pub command: Option<String>,

    /// Output with the leading command line and trailing prompts removed.
    pub body: String,

    /// The chunk text exactly as segmented.
    pub raw: String,
}

impl Chunk {
    /// Build a chunk directly from a label and output body.
    ///
    /// Used when the caller already knows which command produced the text.
    pub fn from_parts(label: impl Into<String>, body: impl Into<String>) -> Self {
        let label = label.into();
        let body = body.into();
        Self {
            index: 0,
            command: Some(label.clone()),
            raw: format!("{label}\n{body}"),
            label,
            body,
        }
    }

    /// Check if the chunk starts with a recognized command keyword.
    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }

    /// Diagnostics key for this chunk.
    pub fn key(&self) -> String {
        normalize_label(&self.label)
    }

    /// Get the body lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body.lines()
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
