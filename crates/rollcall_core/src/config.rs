//! Core configuration.
//!
//! # Responsibility
//! - Hold deployment-tunable values used by the attendance service.
//! - Load them from JSON with every field defaulted.
//!
//! # Invariants
//! - A validated config always has a non-empty email domain and image rotation.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const DEFAULT_EMAIL_DOMAIN: &str = "example.com";

/// Default avatar rotation assigned by `images[count mod len]`.
pub const DEFAULT_STUDENT_IMAGES: [&str; 5] = [
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?auto=format&fit=crop&w=100&q=80",
    "https://images.unsplash.com/photo-1506794778202-cad84cf45f1d?auto=format&fit=crop&w=100&q=80",
    "https://images.unsplash.com/photo-1544005313-94ddf0286df2?auto=format&fit=crop&w=100&q=80",
    "https://images.unsplash.com/photo-1552058544-f2b08422138a?auto=format&fit=crop&w=100&q=80",
    "https://images.unsplash.com/photo-1494790108377-be9c29b29330?auto=format&fit=crop&w=100&q=80",
];

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read config: {err}"),
            Self::Parse(err) => write!(f, "cannot parse config: {err}"),
            Self::Invalid(details) => write!(f, "invalid config: {details}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Tunables for the attendance service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// Domain appended to derived student emails.
    pub email_domain: String,
    /// Avatar rotation for students added without an image.
    pub default_images: Vec<String>,
    /// Log level passed to `init_logging`.
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            default_images: DEFAULT_STUDENT_IMAGES
                .iter()
                .map(|image| (*image).to_string())
                .collect(),
            log_level: default_log_level().to_string(),
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let domain = self.email_domain.trim();
        if domain.is_empty() {
            return Err(ConfigError::Invalid("email_domain must not be empty"));
        }
        if domain.contains('@') || domain.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(
                "email_domain must be a bare domain name",
            ));
        }
        if self.default_images.is_empty() {
            return Err(ConfigError::Invalid("default_images must not be empty"));
        }
        Ok(())
    }
}
