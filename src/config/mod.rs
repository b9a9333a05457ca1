//! Configuration management for mejson
//!
//! Configuration is read from a TOML file and then overridden by
//! command-line arguments.
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::SinkKind;
use crate::error::{ConfigError, Result};
use crate::marshal::DEFAULT_MAX_DEPTH;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Conversion configuration
    #[serde(default)]
    pub marshal: MarshalConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Conversion settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarshalConfig {
    /// Maximum container nesting depth (0 disables the limit)
    #[serde(
        default = "default_max_depth",
        serialize_with = "serialize_max_depth",
        deserialize_with = "deserialize_max_depth"
    )]
    pub max_depth: Option<usize>,

    /// Where notices about unrecognized values go
    #[serde(default)]
    pub diagnostics: SinkKind,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Output format (jsonl, pretty)
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Indentation for pretty output
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Enable colored output (pretty format on a terminal only)
    #[serde(default = "default_color_output")]
    pub color_output: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One compact JSON document per line
    ///
    /// Example: `{"_id":{"$oid":"65705d84dfc3f3b5094e1f72"}}`
    Jsonl,

    /// Indented multi-line JSON, documents separated by newlines
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_max_depth() -> Option<usize> {
    Some(DEFAULT_MAX_DEPTH)
}

// No limit is written as 0 so it survives a TOML round trip
fn serialize_max_depth<S: Serializer>(
    value: &Option<usize>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.unwrap_or(0) as u64)
}

fn deserialize_max_depth<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<usize>, D::Error> {
    Ok(Option::<usize>::deserialize(deserializer)?.filter(|&d| d > 0))
}

fn default_format() -> OutputFormat {
    OutputFormat::Jsonl
}

fn default_indent() -> usize {
    2
}

fn default_color_output() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            diagnostics: SinkKind::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            indent: default_indent(),
            color_output: default_color_output(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - `~/.mejson/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mejson")
            .join("config.toml")
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.display().to_string())
            } else {
                ConfigError::InvalidFormat(format!("{}: {}", path.display(), e))
            }
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path, or the default path if present
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.output.indent > 16 {
            return Err(ConfigError::InvalidValue {
                field: "output.indent".to_string(),
                value: self.output.indent.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl OutputFormat {
    /// Parse a format name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "jsonl" | "json" | "compact" => Some(OutputFormat::Jsonl),
            "pretty" | "json-pretty" => Some(OutputFormat::Pretty),
            _ => None,
        }
    }

    /// Check if format requires pretty printing
    pub fn is_pretty(&self) -> bool {
        matches!(self, OutputFormat::Pretty)
    }
}
