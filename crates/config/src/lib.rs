//! User settings, stored as TOML under the platform config directory.

pub mod errors;
pub mod settings;
pub mod xdg;

pub use settings::Settings;

/// Default values.
pub mod defaults {
    pub const DEFAULT_FILE: &str = "data.txt";
    pub const FONT_SIZE: i32 = 14;
    pub const WINDOW_WIDTH: i32 = 800;
    pub const WINDOW_HEIGHT: i32 = 600;
    pub const MIN_WINDOW_WIDTH: i32 = 320;
    pub const MIN_WINDOW_HEIGHT: i32 = 200;
    pub const WRAP_LINES: bool = true;
    pub const STATUS_RESET_MS: u64 = 3500;
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_FILE_NAME: &str = "linepad.log";
}
