//! Builder for configuring an analyzer.

use super::Analyzer;
use crate::capture::{Classifier, Segmenter};
use crate::dialect::vendors::huawei_vrp;
use crate::dialect::{Dialect, DialectRegistry};
use crate::error::{DialectError, Result};
use crate::extract::ExtractorRegistry;

/// Builder for constructing an [`Analyzer`].
///
/// # Example
///
/// ```rust,no_run
/// use ferriscap::AnalyzerBuilder;
///
/// # fn example() -> Result<(), ferriscap::Error> {
/// let analyzer = AnalyzerBuilder::new()
///     .dialect("huawei_vrp")
///     .section_delimiter("=====SECTION=====")
///     .build()?;
/// let analysis = analyzer.analyze_file("capture.txt")?;
/// println!("{}", analysis.summary);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzerBuilder {
    dialect_name: String,
    custom_dialect: Option<Dialect>,
    section_delimiter: Option<String>,
    extractors: Option<ExtractorRegistry>,
    config_prepass: bool,
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerBuilder {
    /// Create a builder for the Huawei VRP dialect with the built-in rules.
    pub fn new() -> Self {
        Self {
            dialect_name: huawei_vrp::DIALECT_NAME.to_string(),
            custom_dialect: None,
            section_delimiter: None,
            extractors: None,
            config_prepass: true,
        }
    }

    /// Set the dialect name (looked up in the global dialect registry).
    pub fn dialect(mut self, name: impl Into<String>) -> Self {
        self.dialect_name = name.into();
        self
    }

    /// Set a custom dialect definition.
    pub fn custom_dialect(mut self, dialect: Dialect) -> Self {
        self.custom_dialect = Some(dialect);
        self
    }

    /// Override the literal section delimiter used by capture scripts.
    pub fn section_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.section_delimiter = Some(delimiter.into());
        self
    }

    /// Replace the built-in extractor rules.
    pub fn extractors(mut self, registry: ExtractorRegistry) -> Self {
        self.extractors = Some(registry);
        self
    }

    /// Run configuration dumps before every other chunk (default: on).
    ///
    /// With the pre-pass, operational tables overwrite values taken from
    /// the configuration. Without it, chunks run in capture order.
    pub fn config_prepass(mut self, enabled: bool) -> Self {
        self.config_prepass = enabled;
        self
    }

    /// Build the analyzer.
    pub fn build(self) -> Result<Analyzer> {
        let mut dialect = match self.custom_dialect {
            Some(custom) => custom,
            None => DialectRegistry::lookup(&self.dialect_name)?,
        };
        if let Some(delimiter) = self.section_delimiter {
            dialect = dialect.with_section_delimiter(delimiter);
        }

        let segmenter = Segmenter::new(&dialect).map_err(DialectError::InvalidPattern)?;
        let classifier = Classifier::new(&dialect).map_err(DialectError::InvalidPattern)?;
        let extractors = match self.extractors {
            Some(registry) => registry,
            None => ExtractorRegistry::builtin().map_err(DialectError::InvalidPattern)?,
        };

        Ok(Analyzer {
            dialect,
            segmenter,
            classifier,
            extractors,
            config_prepass: self.config_prepass,
        })
    }
}
