//! mejson - MongoDB values as Extended JSON
//!
//! This library converts values from MongoDB's native value model into plain
//! JSON trees using the Extended JSON conventions (`{"$oid": ...}`,
//! `{"$date": ...}`, `{"$binary": ...}` and friends).
//!
//! # Modules
//!
//! - `value`: Native value model and conversions from `bson`, `serde_json`, `chrono`
//! - `marshal`: The Extended JSON marshaller and its output tree
//! - `diagnostics`: Notices for values that could not be classified
//! - `dump`: Reading BSON dump streams
//! - `writer`: JSON Lines / pretty JSON output
//! - `cli`: Command-line interface
//! - `config`: Configuration management
//! - `error`: Error types and handling
//!
//! # Example
//!
//! ```rust
//! use mejson::{Value, marshal};
//! use mejson::value::Regex;
//!
//! let out = marshal(&Value::from(Regex::new("^a", "i"))).unwrap();
//! assert_eq!(
//!     out.into_json(),
//!     serde_json::json!({ "$regex": "^a", "$options": "i" })
//! );
//! ```

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod dump;
pub mod error;
pub mod marshal;
pub mod value;
pub mod writer;

// Re-export commonly used types
pub use config::Config;
pub use diagnostics::{DiagnosticSink, MemorySink, Notice, StderrSink, TracingSink};
pub use error::{MejsonError, Result};
pub use marshal::{JsonSafe, Marshaller, marshal};
pub use value::{Mapping, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
