use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use sw_core::WindowConfig;

/// Contents of `sw.toml`. Every table and field is optional.
///
/// ```toml
/// [window]
/// capacity = 31
/// evict = "front"
///
/// [output]
/// json = false
/// precision = 3
/// ```
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// One JSON object per sample instead of plain columns.
    #[serde(default)]
    pub json: bool,
    /// Decimal places in plain output.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            precision: default_precision(),
        }
    }
}

fn default_precision() -> usize {
    3
}

impl Config {
    /// Read `path`, or fall back to defaults when it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use sw_core::Evict;

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.window, WindowConfig::default());
        assert!(!config.output.json);
        assert_eq!(config.output.precision, 3);
    }

    #[test]
    fn test_partial_tables() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[window]\ncapacity = 9\nevict = \"back\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.window.capacity, 9);
        assert_eq!(config.window.evict, Evict::Back);
        assert_eq!(config.output.precision, 3);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[window]\ncapacity = \"many\"").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("invalid config"), "{err}");
    }
}
