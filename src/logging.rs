use crate::config::{Config, LogConfig};
use anyhow::{anyhow, Result};
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Daily rolling file under the data dir; used while something owns stdout.
    File,
    Stderr,
}

fn filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// or buffered file output is lost.
pub fn init(config: &LogConfig, target: LogTarget) -> Result<Option<WorkerGuard>> {
    match target {
        LogTarget::File if config.file => {
            let dir = Config::data_dir();
            fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, "apptools.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter(config))
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
            Ok(Some(guard))
        }
        // stdout is taken and file logging is off: stay silent
        LogTarget::File => Ok(None),
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter(config))
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_falls_back_on_bad_level() {
        let config = LogConfig {
            level: "not a [valid filter".to_string(),
            file: false,
        };
        // Must not panic whatever RUST_LOG holds.
        let _ = filter(&config);
    }

    #[test]
    fn test_file_target_disabled_installs_nothing() {
        let config = LogConfig {
            level: "debug".to_string(),
            file: false,
        };
        assert!(init(&config, LogTarget::File).unwrap().is_none());
    }
}
