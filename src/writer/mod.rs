//! JSON writer for converted documents
//!
//! Writes each converted document either as a single compact line (JSON
//! Lines) or as indented JSON. Colors are applied only to pretty output, so
//! compact output stays clean for piping.

use std::io::Write;

use colored_json::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::marshal::JsonSafe;

/// Streaming writer for converted documents
pub struct DocumentWriter<W: Write> {
    /// Underlying output
    out: W,

    /// Output format
    format: OutputFormat,

    /// Indentation for pretty output
    indent: usize,

    /// Enable colored output
    use_colors: bool,

    /// Number of documents written
    written: usize,
}

impl<W: Write> DocumentWriter<W> {
    /// Create a new writer
    ///
    /// # Arguments
    /// * `out` - Destination
    /// * `format` - Output format
    /// * `indent` - Indentation width for pretty output
    /// * `use_colors` - Colorize pretty output
    pub fn new(out: W, format: OutputFormat, indent: usize, use_colors: bool) -> Self {
        Self {
            out,
            format,
            indent,
            use_colors,
            written: 0,
        }
    }

    /// Create a writer from output configuration
    pub fn from_config(out: W, config: &OutputConfig) -> Self {
        Self::new(out, config.format, config.indent, config.color_output)
    }

    /// Override colorization, e.g. to keep escape codes out of files
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Write one converted document followed by a newline
    pub fn write(&mut self, value: &JsonSafe) -> Result<()> {
        let text = self.render(value)?;
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Flush the destination and return the number of documents written
    pub fn finish(mut self) -> Result<usize> {
        self.out.flush()?;
        debug!("Finished writing {} documents", self.written);
        Ok(self.written)
    }

    /// Number of documents written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Render a value according to the configured format
    pub fn render(&self, value: &JsonSafe) -> Result<String> {
        if !self.format.is_pretty() {
            return Ok(serde_json::to_string(value)?);
        }

        let text = self.to_pretty_string(value)?;
        if self.use_colors {
            Ok(text.to_colored_json_auto().unwrap_or(text))
        } else {
            Ok(text)
        }
    }

    /// Serialize with custom indentation
    fn to_pretty_string<T: Serialize>(&self, value: &T) -> Result<String> {
        let mut buf = Vec::new();
        let indent = " ".repeat(self.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
