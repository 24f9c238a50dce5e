//! Field extraction from classified chunks.
//!
//! Each extractor targets one command family and mutates the shared
//! [`Model`](crate::model::Model). The [`ExtractorRegistry`] decides which
//! extractor runs for a chunk and isolates failures so a single malformed
//! chunk never aborts a parse.

pub mod config;
pub mod fields;
pub mod hardware;
pub mod interfaces;
pub mod protocols;
mod registry;
pub mod routing;
pub mod system;

pub use registry::{Dispatch, ExtractFn, ExtractorRegistry, Rule};
