// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::time::Duration;
use tracing::{debug, info, warn};

use super::file::StudioConfig;
use crate::llm::ModelRoster;

/// Default interval between video operation polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// API keys loaded from environment variables
#[derive(Clone, Default)]
pub struct ApiKeys {
    /// Gemini/Google API key (GEMINI_API_KEY, GOOGLE_API_KEY or API_KEY)
    pub gemini: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("gemini", &self.gemini.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ApiKeys {
    /// Load API keys from environment variables
    pub fn from_env() -> Self {
        let gemini = read_var("GEMINI_API_KEY")
            .or_else(|| read_var("GOOGLE_API_KEY"))
            .or_else(|| read_var("API_KEY"));

        let keys = Self { gemini };
        if keys.gemini.is_some() {
            debug!("Gemini API key loaded");
        } else {
            warn!("No Gemini API key configured - generation will be unavailable");
        }
        keys
    }

    pub fn has_gemini(&self) -> bool {
        self.gemini.is_some()
    }
}

/// Model identifiers: env overrides win over the config file, which wins
/// over built-in defaults
pub fn model_roster(file: &StudioConfig) -> ModelRoster {
    let defaults = ModelRoster::default();
    let pick = |env: &str, from_file: &Option<String>, default: String| {
        read_var(env)
            .or_else(|| from_file.clone().filter(|s| !s.trim().is_empty()))
            .unwrap_or(default)
    };

    ModelRoster {
        primary: pick("STUDYFORGE_PRIMARY_MODEL", &file.models.primary, defaults.primary),
        secondary: pick(
            "STUDYFORGE_SECONDARY_MODEL",
            &file.models.secondary,
            defaults.secondary,
        ),
        fast: pick("STUDYFORGE_FAST_MODEL", &file.models.fast, defaults.fast),
        video: pick("STUDYFORGE_VIDEO_MODEL", &file.models.video, defaults.video),
    }
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub api_keys: ApiKeys,
    pub models: ModelRoster,
    /// Video poll interval (STUDYFORGE_VIDEO_POLL_SECS)
    pub poll_interval: Duration,
    /// Give up on a video job after this long (STUDYFORGE_VIDEO_DEADLINE_SECS)
    pub video_deadline: Option<Duration>,
}

impl EnvConfig {
    /// Load all configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");
        Self::from_file(&StudioConfig::load())
    }

    pub fn from_file(file: &StudioConfig) -> Self {
        let poll_interval = parse_secs_env("STUDYFORGE_VIDEO_POLL_SECS")
            .or(file.video.poll_secs.map(Duration::from_secs))
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        let video_deadline = parse_secs_env("STUDYFORGE_VIDEO_DEADLINE_SECS")
            .or(file.video.deadline_secs.map(Duration::from_secs));

        Self {
            api_keys: ApiKeys::from_env(),
            models: model_roster(file),
            poll_interval,
            video_deadline,
        }
    }

    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::default();

        if !self.api_keys.has_gemini() {
            validation.add_error("No API key configured. Set GEMINI_API_KEY.");
        }

        if self.models.primary == self.models.secondary {
            validation.add_warning(format!(
                "Primary and secondary models are both '{}'; tier fallback cannot help",
                self.models.primary
            ));
        }

        if self.poll_interval.is_zero() {
            validation.add_error("STUDYFORGE_VIDEO_POLL_SECS must be greater than zero");
        }

        validation
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_secs_env(name: &str) -> Option<Duration> {
    let raw = read_var(name)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => {
            warn!(var = name, value = %raw, "Ignoring non-numeric duration");
            None
        }
    }
}
