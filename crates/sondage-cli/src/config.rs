use std::path::{Path, PathBuf};

use sondage_analysis::{
    describe::DEFAULT_PREVIEW_ROWS,
    sampling::{DEFAULT_SAMPLE_SIZE, DEFAULT_SEED},
    session::SessionConfig,
};

use crate::util;

/// Settings read from the optional JSON configuration file.
///
/// Missing fields take their default value; unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub seed: u64,
    pub preview_rows: usize,
    pub output_dir: PathBuf,
    pub default_sample_size: usize,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            output_dir: PathBuf::from("."),
            default_sample_size: DEFAULT_SAMPLE_SIZE,
            log_file: None,
        }
    }
}

impl Config {
    /// Reads the configuration file, or returns the defaults without one.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => util::read_json_file("config", path),
            None => Ok(Self::default()),
        }
    }

    /// Applies command-line overrides on top of the file settings.
    #[must_use]
    pub fn with_overrides(self, output_dir: Option<PathBuf>, log_file: Option<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.unwrap_or(self.output_dir),
            log_file: log_file.or(self.log_file),
            ..self
        }
    }

    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            seed: self.seed,
            preview_rows: self.preview_rows,
            default_sample_size: self.default_sample_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(
            config,
            Config {
                seed: 7,
                ..Config::default()
            }
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{ "sed": 7 }"#).is_err());
    }

    #[test]
    fn test_load_file_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sondage.json");
        fs::write(
            &path,
            r#"{ "preview_rows": 10, "output_dir": "exports", "log_file": "a.log" }"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.output_dir, Path::new("exports"));

        let config = config.with_overrides(Some(PathBuf::from("out")), None);
        assert_eq!(config.output_dir, Path::new("out"));
        assert_eq!(config.log_file.as_deref(), Some(Path::new("a.log")));
        assert_eq!(config.session_config().preview_rows, 10);
    }

    #[test]
    fn test_load_without_file() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{").unwrap();
        assert!(Config::load(Some(&path)).is_err());
        assert!(Config::load(Some(&dir.path().join("missing.json"))).is_err());
    }
}
