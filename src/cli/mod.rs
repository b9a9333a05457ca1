//! Command-line interface for mejson
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and command-line overrides
//! - Subcommands (version, completion, config)
//! - Opening input and output streams for dump conversion

pub mod completion;

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{Level, debug};

use crate::config::{Config, OutputFormat};
use crate::diagnostics::SinkKind;
use crate::dump::convert_dump;
use crate::error::{ConfigError, Result};
use crate::marshal::Marshaller;
use crate::writer::DocumentWriter;

/// mejson - MongoDB values to Extended JSON
#[derive(Parser, Debug)]
#[command(
    name = "mejson",
    version,
    about = "Convert BSON dumps to Extended JSON",
    long_about = "Reads a stream of BSON documents (as written by mongodump) and writes each
document as Extended JSON, one per line or pretty-printed."
)]
pub struct CliArgs {
    /// BSON dump file to read ('-' or omitted for stdin)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Output format (jsonl, pretty)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Indentation width for pretty output
    #[arg(long, value_name = "N")]
    pub indent: Option<usize>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Maximum nesting depth (0 disables the limit)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Where to report unrecognized values (tracing, stderr)
    #[arg(long, value_name = "SINK")]
    pub diagnostics: Option<String>,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for mejson
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;
        Self::apply_args_to_config(&mut config, args)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) -> Result<()> {
        if let Some(name) = &args.format {
            config.output.format =
                OutputFormat::parse(name).ok_or_else(|| ConfigError::InvalidValue {
                    field: "format".to_string(),
                    value: name.clone(),
                })?;
        }

        if let Some(indent) = args.indent {
            config.output.indent = indent;
        }

        if args.no_color {
            config.output.color_output = false;
        }

        if let Some(depth) = args.max_depth {
            config.marshal.max_depth = (depth > 0).then_some(depth);
        }

        if let Some(name) = &args.diagnostics {
            config.marshal.diagnostics =
                SinkKind::parse(name).ok_or_else(|| ConfigError::InvalidValue {
                    field: "diagnostics".to_string(),
                    value: name.clone(),
                })?;
        }

        Ok(())
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if a subcommand ran and the program should exit
    pub fn handle_subcommand(&self) -> Result<bool> {
        let Some(command) = &self.args.command else {
            return Ok(false);
        };

        let stdout = io::stdout();
        let mut out = stdout.lock();
        match command {
            Commands::Version => {
                writeln!(out, "mejson {}", crate::VERSION)?;
            }
            Commands::Completion { shell } => {
                completion::generate_completion(shell, &mut out)?;
            }
            Commands::Config { show } => {
                if *show {
                    write!(out, "{}", self.config.to_toml()?)?;
                } else {
                    writeln!(out, "Config file: {}", self.config_path_display())?;
                }
            }
        }
        Ok(true)
    }

    /// Convert the input dump to the configured output
    ///
    /// # Returns
    /// * `Result<usize>` - Number of documents converted
    pub fn run_conversion(&self) -> Result<usize> {
        let marshaller = self.marshaller();
        let reader = self.open_input()?;
        let (out, to_stdout) = self.open_output()?;

        let mut writer = DocumentWriter::from_config(out, &self.config.output)
            .with_colors(self.colors_for(to_stdout));
        convert_dump(reader, &mut writer, &marshaller)?;
        writer.finish()
    }

    /// Build the marshaller described by the configuration
    pub fn marshaller(&self) -> Marshaller {
        Marshaller::from_config(&self.config.marshal)
    }

    /// Whether pretty output should be colorized for the given destination
    ///
    /// Files never get escape codes, whatever the terminal state of stdout.
    pub fn colors_for(&self, to_stdout: bool) -> bool {
        to_stdout && self.config.output.color_output
    }

    /// Log level implied by the verbosity flags and configuration
    pub fn log_level(&self) -> Level {
        if self.args.very_verbose {
            Level::TRACE
        } else if self.args.verbose {
            Level::DEBUG
        } else if self.args.quiet {
            Level::ERROR
        } else {
            self.config.logging.level.to_tracing_level()
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    fn open_input(&self) -> Result<Box<dyn Read>> {
        match self.args.input.as_deref() {
            Some(path) if !is_stdio(path) => {
                debug!("Reading dump from {}", path.display());
                Ok(Box::new(BufReader::new(File::open(path)?)))
            }
            _ => {
                debug!("Reading dump from stdin");
                Ok(Box::new(BufReader::new(io::stdin())))
            }
        }
    }

    /// Open the output stream; the flag tells whether it is stdout
    fn open_output(&self) -> Result<(Box<dyn Write>, bool)> {
        match self.args.output.as_deref() {
            Some(path) if !is_stdio(path) => {
                debug!("Writing output to {}", path.display());
                Ok((Box::new(BufWriter::new(File::create(path)?)), false))
            }
            _ => Ok((Box::new(BufWriter::new(io::stdout())), true)),
        }
    }

    fn config_path_display(&self) -> String {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
            .display()
            .to_string()
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}
