//! Capture analysis pipeline.
//!
//! An [`Analyzer`] owns everything that is fixed for a dialect (segmenter,
//! classifier, extractor rules) and turns one capture at a time into a
//! fresh [`Model`]:
//!
//! 1. read and sanitize the text
//! 2. resolve the hostname from the session prompts
//! 3. segment and classify command chunks
//! 4. run configuration dumps first, then every other chunk in order
//! 5. drop duplicate list entries

mod analysis;
mod builder;
mod dedup;

pub use analysis::{Analysis, BatchReport, Summary};
pub use builder::AnalyzerBuilder;
pub use dedup::dedup;

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::batch::read_capture;
use crate::capture::sanitize::sanitize;
use crate::capture::{Chunk, Classifier, Segmenter};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::extract::ExtractorRegistry;
use crate::extract::fields::builtin_regex;
use crate::model::Model;

/// Rule name of the configuration dump extractor.
const CONFIG_RULE: &str = "configuration";

/// Label given to configuration text found outside a configuration command.
const BARE_CONFIG_LABEL: &str = "display saved-configuration";

static CONFIG_MARKER: Lazy<Regex> = Lazy::new(|| {
    builtin_regex(r"(?m)^(?:sysname\s+\S|interface\s+\S|!Software\s+Version|ip\s+vpn-instance\s+\S)")
});

/// First line of a configuration dump printed inside another chunk.
static EMBEDDED_CONFIG: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"^(?:!Software\s+Version|sysname\s+\S)"));

/// Parses captures into device models.
#[derive(Debug, Clone)]
pub struct Analyzer {
    pub(crate) dialect: Dialect,
    pub(crate) segmenter: Segmenter,
    pub(crate) classifier: Classifier,
    pub(crate) extractors: ExtractorRegistry,
    pub(crate) config_prepass: bool,
}

impl Analyzer {
    /// Create an analyzer with the default Huawei VRP settings.
    pub fn new() -> Result<Self> {
        AnalyzerBuilder::new().build()
    }

    /// Start configuring an analyzer.
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// The dialect in use.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// The extractor rules in use.
    pub fn extractors(&self) -> &ExtractorRegistry {
        &self.extractors
    }

    /// Read and parse one capture file.
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> Result<Analysis> {
        let path = path.as_ref();
        let raw = read_capture(path)?;
        let model = self.parse(&raw);
        let analysis = Analysis::new(model, path);
        info!("{}", analysis.summary);
        Ok(analysis)
    }

    /// Parse several files; one failing file never stops the rest.
    pub fn analyze_batch<P: AsRef<Path>>(&self, paths: &[P]) -> BatchReport {
        let mut report = BatchReport::default();
        for path in paths {
            let path = path.as_ref();
            match self.analyze_file(path) {
                Ok(analysis) => report.successes.push(analysis),
                Err(error) => {
                    warn!("skipping {}: {}", path.display(), error);
                    report.failures.push((path.to_path_buf(), error));
                }
            }
        }
        info!(
            "batch finished: {} parsed, {} failed",
            report.successes.len(),
            report.failures.len()
        );
        report
    }

    /// Parse capture text into a fresh model.
    pub fn parse(&self, raw: &str) -> Model {
        let mut model = Model::new();
        let text = sanitize(raw, &self.dialect.pager_markers);

        model.identity.hostname = self.resolve_hostname(&text);

        let chunks: Vec<Chunk> = self
            .segmenter
            .split(&text)
            .iter()
            .enumerate()
            .map(|(index, part)| self.classifier.chunk(index, part))
            .collect();
        debug!("capture split into {} chunks", chunks.len());

        if !chunks.iter().any(Chunk::is_command) && CONFIG_MARKER.is_match(&text) {
            debug!("no commands found, treating capture as a configuration file");
            let chunk = Chunk {
                index: 0,
                label: BARE_CONFIG_LABEL.to_string(),
                command: None,
                body: text.clone(),
                raw: text,
            };
            self.extractors.dispatch(&chunk, &mut model);
        } else {
            let chunks: Vec<Chunk> = chunks
                .iter()
                .flat_map(|chunk| match self.split_embedded_config(chunk) {
                    Some((host, dump)) => vec![host, dump],
                    None => vec![chunk.clone()],
                })
                .collect();
            self.run_chunks(&chunks, &mut model);
        }

        dedup(&mut model);
        model
    }

    fn is_config(&self, chunk: &Chunk) -> bool {
        self.extractors
            .find(&chunk.label)
            .is_some_and(|rule| rule.name == CONFIG_RULE)
    }

    /// Move a configuration dump that trails another command's output
    /// (typically after a bare prompt) into a chunk of its own.
    fn split_embedded_config(&self, chunk: &Chunk) -> Option<(Chunk, Chunk)> {
        if self.is_config(chunk) {
            return None;
        }
        let lines: Vec<&str> = chunk.body.lines().collect();
        let start = lines.iter().position(|l| EMBEDDED_CONFIG.is_match(l))?;
        let end = lines[start..]
            .iter()
            .position(|l| l.trim_end() == "return")
            .map_or(lines.len(), |offset| start + offset + 1);
        let config = lines[start..end].join("\n");

        let mut rest: Vec<&str> = lines[..start].to_vec();
        while rest
            .last()
            .is_some_and(|l| l.trim().is_empty() || self.dialect.is_bare_prompt(l))
        {
            rest.pop();
        }
        rest.extend_from_slice(&lines[end..]);
        debug!(
            "{}: configuration dump found inside the output, split out",
            chunk.label
        );

        let host = Chunk {
            body: rest.join("\n"),
            raw: chunk.raw.replacen(&config, "", 1),
            ..chunk.clone()
        };
        let dump = Chunk {
            index: chunk.index,
            label: BARE_CONFIG_LABEL.to_string(),
            command: None,
            body: config.clone(),
            raw: config,
        };
        Some((host, dump))
    }

    fn run_chunks(&self, chunks: &[Chunk], model: &mut Model) {
        if self.config_prepass {
            let (config, rest): (Vec<&Chunk>, Vec<&Chunk>) =
                chunks.iter().partition(|chunk| self.is_config(chunk));
            for chunk in config.into_iter().chain(rest) {
                self.extractors.dispatch(chunk, model);
            }
        } else {
            for chunk in chunks {
                self.extractors.dispatch(chunk, model);
            }
        }
    }

    /// Device name from the session prompts.
    ///
    /// A user-view prompt wins; otherwise the first prompt followed by a
    /// command. Bracketed lines with nothing after them are not trusted since
    /// inventory output prints `[Slot_1]`-style section titles.
    fn resolve_hostname(&self, text: &str) -> Option<String> {
        let user_view = self.dialect.prompt_levels.values().next();
        let mut fallback: Option<&str> = None;

        for line in text.lines() {
            if let Some(host) = user_view.and_then(|level| level.host(line)) {
                return Some(host.to_string());
            }
            let has_command = self
                .dialect
                .prompt_end(line)
                .is_some_and(|end| !line[end..].trim().is_empty());
            if fallback.is_none() && has_command {
                fallback = self.dialect.prompt_host(line);
            }
        }
        fallback.map(str::to_string)
    }
}

/// Convenience wrapper: parse one file with the default analyzer.
pub fn analyze_file(path: impl Into<PathBuf>) -> Result<Analysis> {
    Analyzer::new()?.analyze_file(path.into())
}
