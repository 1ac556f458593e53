//! Application configuration for padexport.
//!
//! User config lives at `~/.padexport/padexport.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PadExportError, Result};
use crate::types::ExportFormat;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "padexport.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".padexport";

// ---------------------------------------------------------------------------
// Config structs (matching padexport.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Export defaults.
    #[serde(default)]
    pub export: ExportDefaultsConfig,

    /// Media resolution policy.
    #[serde(default)]
    pub media: MediaConfig,
}

/// `[export]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDefaultsConfig {
    /// Format used when none is requested (`.html`, `.md`, or `.doc`).
    #[serde(default = "default_format")]
    pub default_format: String,
}

impl Default for ExportDefaultsConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
        }
    }
}

fn default_format() -> String {
    ExportFormat::default().extension().into()
}

/// `[media]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Upper bound on the whole media-resolution stage, in milliseconds.
    /// Unset means the pipeline waits for every resolution to finish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// Export options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime export options, merged from config file + CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Output format.
    pub format: ExportFormat,
    /// Optional bound on media resolution.
    pub media_timeout: Option<Duration>,
}

impl ExportOptions {
    /// Options for `format` with no media timeout.
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            media_timeout: None,
        }
    }
}

impl From<&AppConfig> for ExportOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            format: ExportFormat::from_extension_or_default(Some(&config.export.default_format)),
            media_timeout: config.media.timeout_ms.map(Duration::from_millis),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.padexport/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PadExportError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.padexport/padexport.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PadExportError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PadExportError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PadExportError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PadExportError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PadExportError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("default_format"));
        assert!(!toml_str.contains("timeout_ms"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.export.default_format, ".html");
        assert_eq!(parsed.media.timeout_ms, None);
    }

    #[test]
    fn config_with_media_timeout() {
        let toml_str = r#"
[export]
default_format = ".md"

[media]
timeout_ms = 1500
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        let opts = ExportOptions::from(&config);
        assert_eq!(opts.format, ExportFormat::Markdown);
        assert_eq!(opts.media_timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn unknown_default_format_falls_back_to_html() {
        let toml_str = "[export]\ndefault_format = \".pdf\"\n";
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(ExportOptions::from(&config).format, ExportFormat::Html);
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/padexport.toml")).unwrap_err();
        assert!(matches!(err, PadExportError::Io { .. }));
    }
}
