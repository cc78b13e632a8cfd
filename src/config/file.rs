// src/config/file.rs
// File-based configuration from ~/.studyforge/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Top-level config structure
#[derive(Debug, Deserialize, Default)]
pub struct StudioConfig {
    #[serde(default)]
    pub models: ModelsSection,
    #[serde(default)]
    pub video: VideoSection,
}

/// `[models]` section: model identifiers per tier
#[derive(Debug, Deserialize, Default)]
pub struct ModelsSection {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub fast: Option<String>,
    pub video: Option<String>,
}

/// `[video]` section
#[derive(Debug, Deserialize, Default)]
pub struct VideoSection {
    pub poll_secs: Option<u64>,
    pub deadline_secs: Option<u64>,
}

impl StudioConfig {
    /// Load config from ~/.studyforge/config.toml
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path; missing or malformed files yield defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config from file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".studyforge")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[models]
primary = "gemini-3-pro-preview"
fast = "gemini-2.5-flash-lite"

[video]
poll_secs = 10
"#;
        let config: StudioConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.models.primary.as_deref(), Some("gemini-3-pro-preview"));
        assert_eq!(config.models.fast.as_deref(), Some("gemini-2.5-flash-lite"));
        assert!(config.models.secondary.is_none());
        assert_eq!(config.video.poll_secs, Some(10));
        assert!(config.video.deadline_secs.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: StudioConfig = toml::from_str("").unwrap();
        assert!(config.models.primary.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[video]\ndeadline_secs = 600").unwrap();
        let config = StudioConfig::load_from(file.path());
        assert_eq!(config.video.deadline_secs, Some(600));
    }

    #[test]
    fn test_load_malformed_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[models\nprimary = ").unwrap();
        let config = StudioConfig::load_from(file.path());
        assert!(config.models.primary.is_none());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = StudioConfig::load_from(Path::new("/nonexistent/studyforge.toml"));
        assert!(config.video.poll_secs.is_none());
    }
}
