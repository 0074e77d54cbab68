//! Configuration for the notes panel.
//!
//! Read from a YAML file; command-line flags and environment variables
//! override file values.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::errors::{Error, ErrorKind, Result};
use crate::panel::PanelSettings;
use crate::utils::default_config_path;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// workspace root holding the notes file
    #[serde(default)]
    pub workspace: Option<PathBuf>,

    /// quiet period after the last edit before an autosave, in milliseconds
    #[serde(default = "default_autosave_ms")]
    pub autosave_ms: u64,

    /// tracing filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,

    /// also append logs to this file
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_autosave_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workspace: None,
            autosave_ms: default_autosave_ms(),
            log_level: default_log_level(),
            log_json: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse. Without one, the default
    /// location is used when a file is there, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Config::from_file(p),
            None => match default_config_path() {
                Some(p) if p.is_file() => Config::from_file(&p),
                _ => Ok(Config::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| Error {
            kind: ErrorKind::Config,
            desc: format!("failed to read config {}", path.display()),
            detail: Some(e.to_string()),
        })?;
        Config::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Config> {
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.autosave_ms == 0 {
            return Err(Error {
                kind: ErrorKind::Config,
                desc: "autosave_ms must be greater than zero".to_string(),
                detail: None,
            });
        }
        Ok(())
    }

    /// Apply command-line overrides. `workspace` falls back to the current
    /// directory when neither the file nor the flags name one.
    pub fn apply_overrides(&mut self, workspace: Option<PathBuf>, autosave_ms: Option<u64>) {
        if workspace.is_some() {
            self.workspace = workspace;
        }
        if let Some(ms) = autosave_ms {
            self.autosave_ms = ms.max(1);
        }
        if self.workspace.is_none() {
            self.workspace = std::env::current_dir().ok();
        }
    }

    pub fn panel_settings(&self) -> PanelSettings {
        PanelSettings { autosave_window: Duration::from_millis(self.autosave_ms) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.autosave_ms, 2000);
        assert_eq!(config.log_level, "warn");
        assert!(config.workspace.is_none());
        assert_eq!(config.panel_settings().autosave_window, Duration::from_secs(2));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml("workspace: /tmp/project\nautosave_ms: 500\n").unwrap();
        assert_eq!(config.workspace, Some(PathBuf::from("/tmp/project")));
        assert_eq!(config.autosave_ms, 500);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("\n").unwrap(), Config::default());
    }

    #[test]
    fn test_zero_autosave_is_rejected() {
        let err = Config::from_yaml("autosave_ms: 0").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config));
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = Config::from_yaml("autosave_ms: [nope").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config));
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.yaml"))).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::from_yaml("workspace: /a\nautosave_ms: 500").unwrap();
        config.apply_overrides(Some(PathBuf::from("/b")), Some(100));
        assert_eq!(config.workspace, Some(PathBuf::from("/b")));
        assert_eq!(config.autosave_ms, 100);
    }

    #[test]
    fn test_workspace_falls_back_to_current_dir() {
        let mut config = Config::default();
        config.apply_overrides(None, None);
        assert_eq!(config.workspace, std::env::current_dir().ok());
    }
}
