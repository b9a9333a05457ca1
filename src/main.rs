//! mejson command-line tool
//!
//! Converts BSON dump streams into Extended JSON.
//!
//! # Usage
//!
//! ```bash
//! # JSON Lines to stdout
//! mejson users.bson
//!
//! # Pretty output from stdin
//! cat users.bson | mejson --format pretty
//! ```

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use mejson::Result;
use mejson::cli::CliInterface;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Handle subcommands or convert the input dump
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    let written = cli.run_conversion()?;
    info!("Wrote {} documents", written);
    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// Logs go to stderr so they never mix with converted output. `RUST_LOG`
/// directives take precedence over the configured level.
fn initialize_logging(cli: &CliInterface) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(cli.log_level()).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
