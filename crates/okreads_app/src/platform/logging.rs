//! Logger setup for the okreads binary.
//!
//! Terminal output goes to stderr so log lines never interleave with the
//! reading list and search results printed on stdout.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LogDestination {
    /// The configured log file only.
    #[default]
    File,
    /// stderr only.
    Terminal,
    Both,
}

impl LogDestination {
    fn writes_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }

    fn writes_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("could not create log file {path:?}: {source}")]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("a logger is already installed")]
    AlreadyInstalled(#[from] log::SetLoggerError),
}

/// Installs the global logger. The log file is truncated on every start.
pub fn initialize(
    destination: LogDestination,
    level: LevelFilter,
    log_file: &Path,
) -> Result<(), LoggingError> {
    let config = line_format();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.writes_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if destination.writes_file() {
        let file = File::create(log_file).map_err(|source| LoggingError::CreateFile {
            path: log_file.to_path_buf(),
            source,
        })?;
        loggers.push(WriteLogger::new(level, config, file));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

fn line_format() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Debug)
        .build()
}
