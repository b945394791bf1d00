//! Logger Module
//!
//! A logging setup based on `tracing-subscriber` with support for:
//! - Console output on stderr with color control
//! - File output with multiple formats (Full, Compact, JSON)

pub mod config;
pub mod error;

// Re-export main types
pub use config::*;
pub use error::LoggerError;

use std::fs::{self, File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the global logger with the given configuration
///
/// `RUST_LOG` directives take precedence over the configured level.
pub fn init_logger(config: LoggerConfig) -> Result<(), LoggerError> {
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.directive()));

    tracing_subscriber::registry()
        .with(build_layers(&config)?)
        .with(filter)
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized {
            message: e.to_string(),
        })
}

fn build_layers(config: &LoggerConfig) -> Result<Vec<BoxedLayer>, LoggerError> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    // File layer goes first so console ANSI settings never leak into the file
    // (https://github.com/tokio-rs/tracing/issues/1817)
    if let Some(file) = &config.file {
        let writer = Mutex::new(open_log_file(&file.path, file.append)?);
        let layer = fmt::layer().with_ansi(false).with_target(true);
        layers.push(match file.format {
            LogFormat::Full => layer.with_writer(writer).boxed(),
            LogFormat::Compact => layer.compact().with_writer(writer).boxed(),
            LogFormat::Json => layer.json().with_writer(writer).boxed(),
        });
    }

    if let Some(console) = &config.console {
        let use_ansi = console.colored && std::io::stderr().is_terminal();
        layers.push(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true)
                .boxed(),
        );
    }

    Ok(layers)
}

/// Opens the log file, creating missing parent directories
fn open_log_file(path: &Path, append: bool) -> Result<File, LoggerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/notifiers.log");

        open_log_file(&path, true).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_append_and_truncate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notifiers.log");

        writeln!(open_log_file(&path, true).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path, true).unwrap(), "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");

        writeln!(open_log_file(&path, false).unwrap(), "third").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "third\n");
    }

    #[test]
    fn test_build_layers_per_output() {
        let dir = TempDir::new().unwrap();
        let mut config = LoggerConfig::default();
        assert_eq!(build_layers(&config).unwrap().len(), 1);

        config.file = Some(FileOutput {
            path: dir.path().join("out.log"),
            append: true,
            format: LogFormat::Json,
        });
        assert_eq!(build_layers(&config).unwrap().len(), 2);

        config.console = None;
        assert_eq!(build_layers(&config).unwrap().len(), 1);
    }

    #[test]
    fn test_init_logger_rejects_invalid_config() {
        let config = LoggerConfig {
            level: tracing::Level::INFO,
            console: None,
            file: None,
        };

        let err = init_logger(config).unwrap_err();
        assert!(matches!(err, LoggerError::Config { .. }));
    }
}
