mod file_config;

pub use file_config::FileConfig;

use crate::render::OutputFormat;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// CLI arguments that take part in config resolution.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub history_file: Option<PathBuf>,
    pub output: OutputFormat,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` keeps the catalog in memory.
    pub db_path: Option<PathBuf>,
    /// Used when `LOG_LEVEL` is not set.
    pub log_level: LevelFilter,
    pub history_file: Option<PathBuf>,
    pub output: OutputFormat,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone());

        if let Some(path) = &db_path {
            if path.is_dir() {
                bail!("db_path is a directory: {:?}", path);
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if !parent.is_dir() {
                    bail!("Database directory does not exist: {:?}", parent);
                }
            }
        }

        let log_level = match file.log_level {
            Some(level) => level
                .parse::<LevelFilter>()
                .with_context(|| format!("Invalid log_level in config file: {:?}", level))?,
            None => LevelFilter::WARN,
        };

        Ok(Self {
            db_path,
            log_level,
            history_file: file
                .history_file
                .map(PathBuf::from)
                .or_else(|| cli.history_file.clone()),
            output: file.output.unwrap_or(cli.output),
        })
    }
}
