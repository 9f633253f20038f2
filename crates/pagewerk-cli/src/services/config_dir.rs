// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware configuration lookup.

use std::path::{Path, PathBuf};

use pagewerk_core::config::CONFIG_FILE;
use pagewerk_core::error::Result;
use pagewerk_core::EditorConfig;
use tracing::{debug, info};

/// Return the configuration directory (not created).
pub fn config_dir() -> PathBuf {
    dirs_fallback().join("pagewerk")
}

/// Load the editor configuration from `explicit`, or from the default
/// location when no path was given. A missing file yields the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<EditorConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_dir().join(CONFIG_FILE),
    };
    let config = EditorConfig::load(&path)?;
    if path.exists() {
        info!(path = %path.display(), "configuration loaded");
    } else {
        debug!(path = %path.display(), "no configuration file, using defaults");
    }
    Ok(config)
}

fn dirs_fallback() -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_explicit_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "default_font_size": 9.5 }"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.default_font_size, 9.5);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
