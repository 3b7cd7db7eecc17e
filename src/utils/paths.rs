//! Path utilities for sbtv-console
//!
//! Respects XDG Base Directory Specification

use crate::error::Result;
use std::env;
use tokio::fs;

const APP_NAME: &str = "sbtv-console";

/// Get config directory path
/// Respects XDG_CONFIG_HOME, defaults to ~/.config/sbtv-console
pub fn get_config_dir() -> String {
    let base = env::var("XDG_CONFIG_HOME")
        .unwrap_or_else(|_| {
            dirs::config_dir()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_else(|| format!("{}/.config", env::var("HOME").unwrap_or_default()))
        });

    format!("{}/{}", base, APP_NAME)
}

/// Get settings file path
pub fn get_settings_path() -> String {
    format!("{}/settings.json", get_config_dir())
}

/// Ensure a directory exists
pub async fn ensure_dir(path: &str) -> Result<()> {
    fs::create_dir_all(path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_path_lives_in_config_dir() {
        let path = get_settings_path();
        assert!(path.starts_with(&get_config_dir()));
        assert!(path.ends_with("sbtv-console/settings.json"));
    }
}
