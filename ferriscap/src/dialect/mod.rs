//! Dialect definitions for vendor CLI captures.
//!
//! A dialect describes how a vendor's interactive session looks on the
//! wire: prompt shapes, the command keywords that start a new command,
//! banner/system message prefixes and the literal section delimiter used by
//! capture scripts.

mod definition;
mod prompt_level;
mod registry;
pub mod vendors;

pub use definition::{CommandKeyword, DEFAULT_SECTION_DELIMITER, Dialect};
pub use prompt_level::PromptLevel;
pub use registry::DialectRegistry;
