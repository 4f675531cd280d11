// Application settings
// Loaded from ~/.config/dupcheck/settings.toml

use std::fs;
use std::path::{Path, PathBuf};

use dupcheck_recon::{LinkConfig, ReconError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("{path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: ReconError,
    },
    #[error("cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Default file type for `--export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Rows shown by `preview` and below a comparison summary
    pub rows: usize,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self { rows: 5 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    /// Where `--export` writes; the working directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl ExportSettings {
    /// Path `--export` writes to for a mode's default file name
    /// (`side_by_side_matches.xlsx` and friends).
    pub fn target(&self, default_file_name: &str) -> PathBuf {
        let file = Path::new(default_file_name).with_extension(self.format.extension());
        match &self.directory {
            Some(dir) => dir.join(file),
            None => file,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub link: LinkConfig,
    pub preview: PreviewSettings,
    pub export: ExportSettings,
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dupcheck");
        config_dir.join("settings.toml")
    }

    /// Load settings from disk, falling back to defaults.
    ///
    /// A missing file is normal. An unreadable or invalid file is logged and
    /// ignored so a bad edit never blocks a comparison.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}");
                log::warn!("using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from an explicit path. Errors are returned, not swallowed.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|e| match e {
            SettingsError::Parse { source, .. } => SettingsError::Parse {
                path: path.display().to_string(),
                source,
            },
            SettingsError::Invalid { source, .. } => SettingsError::Invalid {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(contents).map_err(|source| SettingsError::Parse {
            path: "<settings>".into(),
            source,
        })?;
        settings.link.validate().map_err(|source| SettingsError::Invalid {
            path: "<settings>".into(),
            source,
        })?;
        Ok(settings)
    }

    /// Write the defaults to `path`, creating parent directories.
    /// An existing file is left untouched and reported as `false`.
    pub fn write_default(path: &Path) -> Result<bool, SettingsError> {
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let body = toml::to_string_pretty(&Self::default())?;
        let contents = format!(
            "# dupcheck settings\n\
             # Header substrings are matched against trimmed, lower-cased column names.\n\n{body}"
        );

        fs::write(path, contents).map_err(|source| SettingsError::Write {
            path: path.display().to_string(),
            source,
        })?;
        Ok(true)
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
