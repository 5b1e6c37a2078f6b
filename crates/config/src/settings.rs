use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::errors::ConfigResult;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub display: DisplaySettings,
    pub status: StatusSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// File opened at startup. Relative paths resolve against the working
    /// directory.
    pub default_file: std::path::PathBuf,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            default_file: defaults::DEFAULT_FILE.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub font_size: i32,
    pub window_width: i32,
    pub window_height: i32,
    pub wrap_lines: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            font_size: defaults::FONT_SIZE,
            window_width: defaults::WINDOW_WIDTH,
            window_height: defaults::WINDOW_HEIGHT,
            wrap_lines: defaults::WRAP_LINES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSettings {
    /// How long a transient status message stays before the plain
    /// line-count/file status returns.
    pub reset_after_ms: u64,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            reset_after_ms: defaults::STATUS_RESET_MS,
        }
    }
}

impl DisplaySettings {
    /// Window width and height, raised to at least
    /// [`defaults::MIN_WINDOW_WIDTH`] x [`defaults::MIN_WINDOW_HEIGHT`] so the
    /// fixed bars always leave room for the text area.
    #[must_use]
    pub fn window_size(&self) -> (i32, i32) {
        (
            self.window_width.max(defaults::MIN_WINDOW_WIDTH),
            self.window_height.max(defaults::MIN_WINDOW_HEIGHT),
        )
    }
}

impl StatusSettings {
    #[must_use]
    pub fn reset_after(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.reset_after_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
    /// Defaults to `linepad.log` in the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<std::path::PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_owned(),
            file: None,
        }
    }
}

impl LoggingSettings {
    /// The configured level, falling back to `info` for unknown names.
    #[must_use]
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// # Errors
    ///
    /// Fails only when no file is configured and the platform has no data
    /// directory.
    pub fn log_file(&self) -> ConfigResult<std::path::PathBuf> {
        match &self.file {
            Some(file) => Ok(file.clone()),
            None => Ok(crate::xdg::data_dir()?.join(defaults::LOG_FILE_NAME)),
        }
    }
}

impl Settings {
    /// Loads `config.toml` from the config directory, writing the defaults
    /// there on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be determined, the file cannot
    /// be read or written, or its content is not valid TOML for these settings.
    pub fn load() -> ConfigResult<Self> {
        Self::load_or_create(&Self::config_file_path()?)
    }

    /// Loads `path` if it exists; otherwise saves and returns the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::load_from`] and [`Settings::save_to`].
    pub fn load_or_create(path: &std::path::Path) -> ConfigResult<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        let settings = Self::default();
        settings.save_to(path)?;
        log::info!("wrote default config to {}", path.display());

        Ok(settings)
    }

    /// Reads settings from `path`. Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load_from(path: &std::path::Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = toml::from_str(&content)?;

        log::debug!("loaded config from {}", path.display());

        Ok(settings)
    }

    /// Writes settings to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to(&self, path: &std::path::Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, toml::to_string_pretty(self)?)?;

        Ok(())
    }

    /// # Errors
    ///
    /// Fails if the platform has no config directory.
    pub fn config_file_path() -> ConfigResult<std::path::PathBuf> {
        Ok(crate::xdg::config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigError;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.general.default_file, std::path::Path::new("data.txt"));
        assert_eq!(settings.display.font_size, 14);
        assert_eq!(settings.display.window_width, 800);
        assert_eq!(settings.display.window_height, 600);
        assert!(settings.display.wrap_lines);
        assert_eq!(
            settings.status.reset_after(),
            std::time::Duration::from_millis(3500)
        );
        assert_eq!(settings.logging.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let settings = Settings::load_or_create(&path).unwrap();

        assert_eq!(settings, Settings::default());
        assert!(path.is_file(), "Defaults should be persisted on first run");
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut settings = Settings::default();
        settings.general.default_file = "/tmp/notes.txt".into();
        settings.display.wrap_lines = false;
        settings.logging.file = Some("/tmp/linepad.log".into());

        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\nfont_size = 20\n\n[logging]\nlevel = \"debug\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.display.font_size, 20);
        assert_eq!(settings.display.window_width, 800);
        assert_eq!(settings.general, GeneralSettings::default());
        assert_eq!(settings.logging.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_tiny_window_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\nwindow_width = -5\nwindow_height = 40\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(
            settings.display.window_size(),
            (defaults::MIN_WINDOW_WIDTH, defaults::MIN_WINDOW_HEIGHT)
        );
        assert_eq!(Settings::default().display.window_size(), (800, 600));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display\nfont_size = ").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let logging = LoggingSettings {
            level: "chatty".into(),
            file: None,
        };

        assert_eq!(logging.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_explicit_log_file_wins() {
        let logging = LoggingSettings {
            level: "info".into(),
            file: Some("/var/tmp/app.log".into()),
        };

        assert_eq!(
            logging.log_file().unwrap(),
            std::path::PathBuf::from("/var/tmp/app.log")
        );
    }
}
