//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treetile/treetile.toml`
//! 3. Explicit config file given on the command line
//! 4. Environment variables: `TREETILE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Paper dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PaperSettings {
    /// CSV file with the paper records
    pub data_file: PathBuf,
    /// Name of the root node
    pub root_name: String,
    /// Group papers by publication year below the root
    pub by_year: bool,
}

impl Default for PaperSettings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("cs1_papers.csv"),
            root_name: "CS1".into(),
            by_year: true,
        }
    }
}

/// Filesystem walker settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileSystemSettings {
    /// Descend into symlinked directories
    pub follow_links: bool,
    /// Leave out dot files and dot directories
    pub skip_hidden: bool,
}

/// Unified configuration for treetile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Width of the treemap area in pixels
    pub width: i32,
    /// Height of the treemap area in pixels
    pub height: i32,
    /// Seed for node colors; fresh colors on every run when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub papers: PaperSettings,
    pub filesystem: FileSystemSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 738,
            seed: None,
            papers: PaperSettings::default(),
            filesystem: FileSystemSettings::default(),
        }
    }
}

/// Raw paper settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPaperSettings {
    pub data_file: Option<PathBuf>,
    pub root_name: Option<String>,
    pub by_year: Option<bool>,
}

/// Raw filesystem settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawFileSystemSettings {
    pub follow_links: Option<bool>,
    pub skip_hidden: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub seed: Option<u64>,
    pub papers: RawPaperSettings,
    pub filesystem: RawFileSystemSettings,
}

/// Get the XDG config directory for treetile.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treetile").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treetile.toml"))
}

/// Load a TOML file into RawSettings for merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            width: overlay.width.unwrap_or(self.width),
            height: overlay.height.unwrap_or(self.height),
            seed: overlay.seed.or(self.seed),
            papers: PaperSettings {
                data_file: overlay
                    .papers
                    .data_file
                    .clone()
                    .unwrap_or_else(|| self.papers.data_file.clone()),
                root_name: overlay
                    .papers
                    .root_name
                    .clone()
                    .unwrap_or_else(|| self.papers.root_name.clone()),
                by_year: overlay.papers.by_year.unwrap_or(self.papers.by_year),
            },
            filesystem: FileSystemSettings {
                follow_links: overlay
                    .filesystem
                    .follow_links
                    .unwrap_or(self.filesystem.follow_links),
                skip_hidden: overlay
                    .filesystem
                    .skip_hidden
                    .unwrap_or(self.filesystem.skip_hidden),
            },
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.papers.data_file.to_string_lossy().as_ref());
        self.papers.data_file = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply TREETILE_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`, e.g. `TREETILE_PAPERS__BY_YEAR=false`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREETILE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_int("width") {
            settings.width = int_setting("width", val)?;
        }
        if let Ok(val) = config.get_int("height") {
            settings.height = int_setting("height", val)?;
        }
        if let Ok(val) = config.get::<u64>("seed") {
            settings.seed = Some(val);
        }
        if let Ok(val) = config.get_string("papers.data_file") {
            settings.papers.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("papers.root_name") {
            settings.papers.root_name = val;
        }
        if let Ok(val) = config.get_bool("papers.by_year") {
            settings.papers.by_year = val;
        }
        if let Ok(val) = config.get_bool("filesystem.follow_links") {
            settings.filesystem.follow_links = val;
        }
        if let Ok(val) = config.get_bool("filesystem.skip_hidden") {
            settings.filesystem.skip_hidden = val;
        }

        Ok(settings)
    }

    /// Reject geometry the layout engine cannot tile.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ApplicationError::Config {
                message: format!(
                    "width and height must be positive, got {}x{}",
                    self.width, self.height
                ),
            });
        }
        Ok(())
    }

    /// Render as TOML (for `config show`).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn int_setting(key: &str, val: i64) -> Result<i32, ApplicationError> {
    i32::try_from(val).map_err(|_| ApplicationError::Config {
        message: format!("{} out of range: {}", key, val),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_kept() {
        let raw: RawSettings = toml::from_str(
            r#"
width = 640
[papers]
by_year = false
"#,
        )
        .unwrap();
        let merged = Settings::default().merge_with(&raw);

        assert_eq!(merged.width, 640);
        assert_eq!(merged.height, 738);
        assert!(!merged.papers.by_year);
        assert_eq!(merged.papers.root_name, "CS1");
    }

    #[test]
    fn given_default_settings_when_validating_then_ok() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn given_zero_width_when_validating_then_config_error() {
        let settings = Settings {
            width: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_settings_when_serialized_then_roundtrips_through_raw() {
        let settings = Settings {
            seed: Some(7),
            ..Settings::default()
        };
        let raw: RawSettings = toml::from_str(&settings.to_toml().unwrap()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), settings);
    }
}
