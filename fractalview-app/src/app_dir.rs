//! Locations next to the executable: the default config file and exported images.

use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "fractalview.json";

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

pub fn default_config_path() -> PathBuf {
    exe_directory().join(CONFIG_FILE_NAME)
}

/// Directory for exported images when the config does not name one.
pub fn images_directory() -> PathBuf {
    exe_directory().join("images")
}
