//! Configuration loading and parsing.
//!
//! An optional `joule.toml` is discovered in the working directory first,
//! then in the platform config dir; a missing file just yields defaults and
//! unknown fields are tolerated so the format can grow without breaking
//! older binaries. The binary may override discovery with `--config`.
//!
//! ```toml
//! [editor]
//! tab_stop = 3
//! quit_confirm_presses = 3
//! message_timeout_secs = 5
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    /// Render columns per tab stop.
    #[serde(default = "EditorConfig::default_tab_stop")]
    pub tab_stop: usize,
    /// Consecutive quit presses required to discard unsaved changes.
    #[serde(default = "EditorConfig::default_quit_confirm_presses")]
    pub quit_confirm_presses: u8,
    /// How long a status message stays on the message bar.
    #[serde(default = "EditorConfig::default_message_timeout_secs")]
    pub message_timeout_secs: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_stop: Self::default_tab_stop(),
            quit_confirm_presses: Self::default_quit_confirm_presses(),
            message_timeout_secs: Self::default_message_timeout_secs(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_stop() -> usize {
        3
    }
    const fn default_quit_confirm_presses() -> u8 {
        3
    }
    const fn default_message_timeout_secs() -> u64 {
        5
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile,
    /// Original file text when one was found (for diagnostics).
    pub raw: Option<String>,
}

impl Config {
    /// Tab stop with the lower bound the render math relies on.
    pub fn tab_stop(&self) -> usize {
        self.file.editor.tab_stop.max(1)
    }

    pub fn quit_confirm_presses(&self) -> u8 {
        self.file.editor.quit_confirm_presses
    }

    pub fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.file.editor.message_timeout_secs)
    }
}

/// Best-effort config path: working directory first, then the platform
/// config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("joule.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("joule").join("joule.toml");
    }
    PathBuf::from("joule.toml")
}

/// Load configuration from `path` (or the discovered location). A missing
/// file yields defaults; a present-but-invalid file is an error.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    match fs::read_to_string(&path) {
        Ok(content) => {
            let file: ConfigFile = toml::from_str(&content)
                .with_context(|| format!("invalid config file {}", path.display()))?;
            info!(target: "config", file = %path.display(), "config_loaded");
            Ok(Config {
                file,
                raw: Some(content),
            })
        }
        Err(_) => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_no_file() {
        let config = load_from(Some(PathBuf::from("/nonexistent/joule.toml"))).unwrap();
        assert_eq!(config.tab_stop(), 3);
        assert_eq!(config.quit_confirm_presses(), 3);
        assert_eq!(config.message_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn parses_editor_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[editor]\ntab_stop = 8\nquit_confirm_presses = 1\nmessage_timeout_secs = 2"
        )
        .unwrap();
        let config = load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.tab_stop(), 8);
        assert_eq!(config.quit_confirm_presses(), 1);
        assert_eq!(config.message_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn partial_tables_fall_back_per_field() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[editor]\ntab_stop = 4").unwrap();
        let config = load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.tab_stop(), 4);
        assert_eq!(config.quit_confirm_presses(), 3);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[editor]\ntab_stop = 2\nfuture_knob = true").unwrap();
        let config = load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.tab_stop(), 2);
    }

    #[test]
    fn zero_tab_stop_is_clamped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[editor]\ntab_stop = 0").unwrap();
        let config = load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.tab_stop(), 1);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[editor\ntab_stop = ").unwrap();
        assert!(load_from(Some(file.path().to_path_buf())).is_err());
    }
}
