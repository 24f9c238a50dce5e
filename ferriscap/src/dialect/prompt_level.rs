//! Prompt level definition.

use regex::Regex;

/// A prompt shape for one CLI view of a network device.
///
/// Unlike an interactive driver, the analyzer never navigates between
/// views; it only needs to recognize a prompt at the start of a captured
/// line and pull the device name out of it.
#[derive(Debug, Clone)]
pub struct PromptLevel {
    /// Name of this view (e.g., "user_view", "system_view").
    pub name: String,

    /// Regex matching the prompt at the start of a line.
    ///
    /// Must define a named group `host`.
    pub pattern: Regex,

    /// Strings that must NOT be in the line for this level to match.
    pub not_contains: Vec<String>,
}

impl PromptLevel {
    /// Create a new prompt level.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            not_contains: vec![],
        })
    }

    /// Add a not_contains pattern.
    pub fn with_not_contains(mut self, pattern: impl Into<String>) -> Self {
        self.not_contains.push(pattern.into());
        self
    }

    /// Check if a line starts with this prompt.
    pub fn matches(&self, line: &str) -> bool {
        self.find(line).is_some()
    }

    /// Return the byte offset where the prompt ends, if the line starts with it.
    pub fn find(&self, line: &str) -> Option<usize> {
        for nc in &self.not_contains {
            if line.contains(nc) {
                return None;
            }
        }
        self.pattern.find(line).map(|m| m.end())
    }

    /// Extract the device name from a prompt line.
    pub fn host<'a>(&self, line: &'a str) -> Option<&'a str> {
        if self.find(line).is_none() {
            return None;
        }
        self.pattern
            .captures(line)
            .and_then(|caps| caps.name("host"))
            .map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_level_host() {
        let level = PromptLevel::new("user_view", r"^\s*<(?P<host>[^<>\s]+)>").unwrap();
        assert!(level.matches("<PE1>display version"));
        assert_eq!(level.host("<PE1>display version"), Some("PE1"));
        assert_eq!(level.host("display version"), None);
    }

    #[test]
    fn test_prompt_level_not_contains() {
        let level = PromptLevel::new("system_view", r"^\s*\[(?P<host>[^\[\]\s]+)\]")
            .unwrap()
            .with_not_contains("[edit");

        assert!(level.matches("[PE1]"));
        assert!(!level.matches("[edit]"));
    }
}
