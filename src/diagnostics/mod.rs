//! Diagnostic notices for best-effort conversions
//!
//! The marshaller never fails on values it cannot classify. It reports them
//! through a [`DiagnosticSink`] handed to it at construction and carries on.
//! Three sinks are provided:
//! - [`TracingSink`]: emits a `tracing` warning (default)
//! - [`StderrSink`]: writes one line per notice to standard error
//! - [`MemorySink`]: records notices for later inspection

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A soft-failure event raised during conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A value had no encoding rule and was passed through unchanged
    UnknownType { type_name: String },

    /// A mapping came in a representation outside the accepted set and was
    /// replaced by an empty mapping
    UnexpectedMapping { type_name: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::UnknownType { type_name } => write!(f, "mejson: unknown type: {type_name}"),
            Notice::UnexpectedMapping { type_name } => write!(
                f,
                "mejson: unexpected mapping type {type_name}, substituting an empty mapping"
            ),
        }
    }
}

/// Destination for diagnostic notices
///
/// Implementations must tolerate concurrent calls; a single marshaller may be
/// shared across threads.
pub trait DiagnosticSink: Send + Sync {
    /// Record one notice
    fn notice(&self, notice: &Notice);
}

/// Sink that forwards notices to `tracing` at WARN level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn notice(&self, notice: &Notice) {
        match notice {
            Notice::UnknownType { type_name } => {
                warn!(type_name = %type_name, "unknown type passed through unchanged");
            }
            Notice::UnexpectedMapping { type_name } => {
                warn!(type_name = %type_name, "unexpected mapping type replaced by empty mapping");
            }
        }
    }
}

/// Sink that writes each notice as a line on standard error
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn notice(&self, notice: &Notice) {
        // Nothing sensible to do if stderr itself is gone
        let _ = writeln!(io::stderr().lock(), "{notice}");
    }
}

/// Sink that keeps every notice in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    notices: Mutex<Vec<Notice>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notices recorded so far
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget all recorded notices
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DiagnosticSink for MemorySink {
    fn notice(&self, notice: &Notice) {
        self.lock().push(notice.clone());
    }
}

/// Which built-in sink to use, as named in configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Route notices through `tracing`
    #[default]
    Tracing,

    /// Write notices directly to standard error
    Stderr,
}

impl SinkKind {
    /// Parse a sink name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "tracing" | "log" => Some(SinkKind::Tracing),
            "stderr" => Some(SinkKind::Stderr),
            _ => None,
        }
    }
}
