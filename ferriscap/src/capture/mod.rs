//! Capture layer: turning raw session text into classified command chunks.
//!
//! This module handles everything that happens before field extraction:
//! removing terminal noise, splitting the capture into command-scoped
//! chunks and deriving a canonical command label for each one.

mod chunk;
mod classify;
pub mod patterns;
pub mod sanitize;
mod segment;

pub use chunk::Chunk;
pub use classify::{Classification, Classifier, normalize_label};
pub use segment::Segmenter;
