//! Dialect definition for vendor-specific capture conventions.

use indexmap::IndexMap;

use super::prompt_level::PromptLevel;

/// Default literal that capture scripts insert between commands.
pub const DEFAULT_SECTION_DELIMITER: &str = "=====FERRISCAP-SECTION=====";

/// A command keyword that may be abbreviated on the CLI.
///
/// VRP accepts any unambiguous prefix, so `display` can be typed as
/// `dis`, `disp`, ... down to `min_len` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandKeyword {
    /// Full keyword (e.g., "display").
    pub word: String,

    /// Shortest accepted abbreviation length.
    pub min_len: usize,
}

impl CommandKeyword {
    /// Create a new keyword.
    pub fn new(word: impl Into<String>, min_len: usize) -> Self {
        let word = word.into();
        let min_len = min_len.clamp(1, word.len().max(1));
        Self { word, min_len }
    }

    /// The mandatory prefix of the keyword.
    pub fn prefix(&self) -> &str {
        &self.word[..self.min_len]
    }
}

/// Dialect definition containing all vendor-specific capture conventions.
#[derive(Debug, Clone)]
pub struct Dialect {
    /// Dialect name (e.g., "huawei_vrp").
    pub name: String,

    /// Prompt shapes, in match priority order.
    pub prompt_levels: IndexMap<String, PromptLevel>,

    /// Keywords that begin an operational command.
    pub command_keywords: Vec<CommandKeyword>,

    /// Line prefixes of banners and system messages the classifier skips.
    pub system_message_prefixes: Vec<String>,

    /// Pager artifacts removed during sanitizing.
    pub pager_markers: Vec<String>,

    /// Literal line separating command sections in scripted captures.
    pub section_delimiter: String,
}

impl Dialect {
    /// Create a new dialect definition with minimal required fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt_levels: IndexMap::new(),
            command_keywords: vec![],
            system_message_prefixes: vec![],
            pager_markers: vec![],
            section_delimiter: DEFAULT_SECTION_DELIMITER.to_string(),
        }
    }

    /// Add a prompt level.
    pub fn with_prompt(mut self, level: PromptLevel) -> Self {
        self.prompt_levels.insert(level.name.clone(), level);
        self
    }

    /// Add a command keyword.
    pub fn with_keyword(mut self, word: impl Into<String>, min_len: usize) -> Self {
        self.command_keywords.push(CommandKeyword::new(word, min_len));
        self
    }

    /// Add a system message prefix.
    pub fn with_system_message(mut self, prefix: impl Into<String>) -> Self {
        self.system_message_prefixes.push(prefix.into());
        self
    }

    /// Add a pager marker.
    pub fn with_pager_marker(mut self, marker: impl Into<String>) -> Self {
        self.pager_markers.push(marker.into());
        self
    }

    /// Set the section delimiter.
    pub fn with_section_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.section_delimiter = delimiter.into();
        self
    }

    /// Get a prompt level by name.
    pub fn get_prompt(&self, name: &str) -> Option<&PromptLevel> {
        self.prompt_levels.get(name)
    }

    /// Length of the prompt at the start of `line`, if any level matches.
    pub fn prompt_end(&self, line: &str) -> Option<usize> {
        self.prompt_levels.values().find_map(|level| level.find(line))
    }

    /// Device name from the first prompt level matching `line`.
    pub fn prompt_host<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.prompt_levels.values().find_map(|level| level.host(line))
    }

    /// Check if `line` is a prompt with nothing typed after it.
    pub fn is_bare_prompt(&self, line: &str) -> bool {
        match self.prompt_end(line) {
            Some(end) => line[end..].trim().is_empty(),
            None => false,
        }
    }

    /// Check if `line` is a banner or system message.
    pub fn is_system_message(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        self.system_message_prefixes
            .iter()
            .any(|prefix| trimmed.starts_with(prefix.as_str()))
    }
}
