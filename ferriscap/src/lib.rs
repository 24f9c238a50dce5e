//! # Ferriscap
//!
//! Offline analyzer for network device CLI captures.
//!
//! Ferriscap reads a saved terminal session or scripted capture from a
//! Huawei VRP router or switch, splits it into command chunks and turns the
//! recognized command outputs into one structured, JSON-serializable device
//! record. Output nobody recognized is kept verbatim so nothing is lost.
//!
//! ## Features
//!
//! - Delimiter-based and prompt-based capture segmentation
//! - Abbreviation-tolerant command classification (`dis int br`)
//! - Ordered `(pattern, extractor)` rule table with per-chunk fault isolation
//! - Full configuration dump extraction with BGP peer scoping
//! - Directory batch mode with per-file failure reporting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ferriscap::Analyzer;
//!
//! fn main() -> Result<(), ferriscap::Error> {
//!     let analyzer = Analyzer::new()?;
//!     let analysis = analyzer.analyze_file("capture.txt")?;
//!
//!     println!("{}", analysis.summary);
//!     for iface in analysis.model.interfaces.iter() {
//!         println!("{} {:?}", iface.name, iface.status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod batch;
pub mod capture;
pub mod dialect;
pub mod error;
pub mod extract;
pub mod model;
pub mod output;

// Re-export main types for convenience
pub use analyzer::{Analysis, Analyzer, AnalyzerBuilder, BatchReport, Summary, analyze_file};
pub use capture::Chunk;
pub use dialect::{Dialect, DialectRegistry, PromptLevel};
pub use error::Error;
pub use extract::ExtractorRegistry;
pub use model::{Interface, Model};
