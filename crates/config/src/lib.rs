// Configuration loading

pub mod settings;

pub use settings::{ExportFormat, ExportSettings, PreviewSettings, Settings, SettingsError};
