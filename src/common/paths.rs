//! Configuration and report paths

use std::path::PathBuf;

/// Application name used for platform directories
const APP_NAME: &str = "softsync-tester";

/// Default report location, relative to the working directory
pub const DEFAULT_REPORT_PATH: &str = "test_reports/backend_test_results.json";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/softsync-tester/`
/// - macOS: `~/Library/Application Support/softsync-tester/`
/// - Windows: `%APPDATA%\softsync-tester\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Default path of the persisted JSON report
pub fn default_report_path() -> PathBuf {
    PathBuf::from(DEFAULT_REPORT_PATH)
}
