//! Configuration module for the bast CLI.
//!
//! Models every option a project-level config file can carry. Only
//! `root_dir`, `files`, and the `extends` chain affect `basc-drv`'s
//! behavior; the rest are parsed and shape-validated so a malformed config
//! file is reported as a configuration error (exit code 2) without this
//! crate pretending to implement the build/deploy pipeline that would
//! actually consume them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BastError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "bast.toml";

/// `logLevel`, restricted to a known set so an unrecognized value is a
/// shape error at parse time rather than silently ignored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// The full section 6 configuration surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BascConfig {
    /// Root directory scripts and components are resolved relative to.
    #[serde(default = "default_root_dir")]
    pub root_dir: String,

    /// Glob-like include patterns passed to the `FileProvider`. Empty means
    /// the driver's own default (`*.bs`, `*.brs`, `*.xml`).
    #[serde(default)]
    pub files: Vec<String>,

    /// Where `bast transpile` writes output when `--out` isn't given.
    #[serde(default)]
    pub out_file: Option<String>,

    #[serde(default)]
    pub staging_folder_path: Option<String>,

    #[serde(default)]
    pub watch: bool,

    #[serde(default = "default_true")]
    pub create_package: bool,

    #[serde(default)]
    pub deploy: bool,

    #[serde(default = "default_true")]
    pub copy_to_staging: bool,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub retain_staging_folder: bool,

    #[serde(default)]
    pub log_level: LogLevel,

    /// Path to a parent config this one extends, resolved relative to the
    /// file that names it.
    #[serde(default)]
    pub extends: Option<String>,

    #[serde(default)]
    pub plugins: Vec<String>,

    #[serde(default)]
    pub auto_import_component_script: bool,
}

fn default_root_dir() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for BascConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            files: Vec::new(),
            out_file: None,
            staging_folder_path: None,
            watch: false,
            create_package: true,
            deploy: false,
            copy_to_staging: true,
            username: None,
            password: None,
            host: None,
            retain_staging_folder: false,
            log_level: LogLevel::default(),
            extends: None,
            plugins: Vec::new(),
            auto_import_component_script: false,
        }
    }
}

impl BascConfig {
    /// Loads a config from `path`, following its `extends` chain. A config
    /// that names itself (directly or transitively) as an ancestor is a
    /// configuration error rather than an infinite loop.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        Self::load_chain(path, &mut Vec::new())
    }

    fn load_chain(path: &Path, seen: &mut Vec<PathBuf>) -> Result<Self> {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if seen.contains(&canonical) {
            return Err(BastError::Config(format!("extends cycle detected at {}", path.display())));
        }
        seen.push(canonical);

        if !path.exists() {
            return Err(BastError::Config(format!("configuration file not found: {}", path.display())));
        }
        let content = std::fs::read_to_string(path)?;
        let config: BascConfig =
            toml::from_str(&content).map_err(|e| BastError::Config(format!("failed to parse {}: {e}", path.display())))?;

        let merged = match &config.extends {
            Some(parent) => {
                let parent_path = path.parent().unwrap_or_else(|| Path::new(".")).join(parent);
                let base = Self::load_chain(&parent_path, seen)?;
                config.overlay_onto(base)
            }
            None => config,
        };

        merged.validate_shape()?;
        Ok(merged)
    }

    /// Takes `self`'s explicitly-meaningful fields over `base`, falling back
    /// to `base` wherever `self` still holds the bare serde default. This is
    /// a shallow, best-effort merge: config inheritance here exists so
    /// `rootDir`/`files`/`extends` compose predictably, not to fully model
    /// every tool's override semantics.
    fn overlay_onto(self, base: Self) -> Self {
        let default = Self::default();
        Self {
            root_dir: if self.root_dir != default.root_dir { self.root_dir } else { base.root_dir },
            files: if !self.files.is_empty() { self.files } else { base.files },
            out_file: self.out_file.or(base.out_file),
            staging_folder_path: self.staging_folder_path.or(base.staging_folder_path),
            watch: self.watch || base.watch,
            create_package: self.create_package && base.create_package,
            deploy: self.deploy || base.deploy,
            copy_to_staging: self.copy_to_staging && base.copy_to_staging,
            username: self.username.or(base.username),
            password: self.password.or(base.password),
            host: self.host.or(base.host),
            retain_staging_folder: self.retain_staging_folder || base.retain_staging_folder,
            log_level: if self.log_level != default.log_level { self.log_level } else { base.log_level },
            extends: None,
            plugins: if !self.plugins.is_empty() { self.plugins } else { base.plugins },
            auto_import_component_script: self.auto_import_component_script || base.auto_import_component_script,
        }
    }

    /// Shape validation beyond what serde's typed fields already enforce:
    /// `host` must be a non-empty string when `deploy` is requested.
    fn validate_shape(&self) -> Result<()> {
        if self.deploy {
            match &self.host {
                Some(h) if !h.trim().is_empty() => {}
                _ => return Err(BastError::Config("deploy is set but host is missing or empty".to_string())),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = BascConfig::default();
        assert_eq!(config.root_dir, ".");
        assert!(config.files.is_empty());
        assert!(config.create_package);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_load_minimal_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bast.toml");
        std::fs::write(&path, "rootDir = \"src\"\n").unwrap();
        let config = BascConfig::load_from_path(&path).unwrap();
        assert_eq!(config.root_dir, "src");
        assert!(!config.deploy);
    }

    #[test]
    fn test_deploy_without_host_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bast.toml");
        std::fs::write(&path, "deploy = true\n").unwrap();
        let err = BascConfig::load_from_path(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_unknown_log_level_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bast.toml");
        std::fs::write(&path, "logLevel = \"verbose\"\n").unwrap();
        assert!(BascConfig::load_from_path(&path).is_err());
    }

    #[test]
    fn test_extends_merges_root_dir_from_parent() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("base.toml"), "rootDir = \"shared\"\ncreatePackage = false\n").unwrap();
        std::fs::write(dir.path().join("bast.toml"), "extends = \"base.toml\"\n").unwrap();

        let config = BascConfig::load_from_path(&dir.path().join("bast.toml")).unwrap();
        assert_eq!(config.root_dir, "shared");
        assert!(!config.create_package);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = BascConfig::load_from_path(Path::new("/nonexistent/bast.toml"));
        assert!(result.is_err());
    }
}
