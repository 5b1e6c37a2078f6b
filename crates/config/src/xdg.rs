use crate::errors::{ConfigError, ConfigResult};

const APP_NAME: &str = "linepad";

/// `$XDG_CONFIG_HOME/linepad` or the platform equivalent.
///
/// # Errors
///
/// [`ConfigError::NoConfigDir`] if the platform has no config directory.
pub fn config_dir() -> ConfigResult<std::path::PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// `$XDG_DATA_HOME/linepad` or the platform equivalent. Holds the log file.
///
/// # Errors
///
/// [`ConfigError::NoConfigDir`] if the platform has no data directory.
pub fn data_dir() -> ConfigResult<std::path::PathBuf> {
    dirs::data_dir()
        .map(|p| p.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_are_app_specific() {
        if let (Ok(config), Ok(data)) = (config_dir(), data_dir()) {
            assert!(config.ends_with(APP_NAME));
            assert!(data.ends_with(APP_NAME));
        }
    }
}
