use crate::render::OutputFormat;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings read from the optional TOML config file.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    /// Catalog database file. The catalog lives in memory when unset.
    pub db_path: Option<String>,
    pub log_level: Option<String>,
    pub history_file: Option<String>,
    pub output: Option<OutputFormat>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
db_path = "/var/lib/vn/catalog.db"
log_level = "debug"
history_file = "/tmp/vn_history"
output = "html"
"#
        )
        .unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.db_path.as_deref(), Some("/var/lib/vn/catalog.db"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.history_file.as_deref(), Some("/tmp/vn_history"));
        assert_eq!(config.output, Some(OutputFormat::Html));
    }

    #[test]
    fn test_load_empty_config() {
        let file = NamedTempFile::new().unwrap();
        let config = FileConfig::load(file.path()).unwrap();
        assert!(config.db_path.is_none());
        assert!(config.output.is_none());
    }

    #[test]
    fn test_load_rejects_unknown_output() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"output = "xml""#).unwrap();
        assert!(FileConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = FileConfig::load(Path::new("/nonexistent/vn-catalog.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
