//! Cascade configuration
//!
//! Settings come from code (builder methods), from JSON or TOML text, or
//! from the environment:
//!
//! | Variable | Values |
//! |----------|--------|
//! | `CASCADE_DIAGNOSTICS` | `warn` (default), `off` |
//!
//! [`crate::Provider::new`] and [`crate::ScopeTree::new`] read the
//! environment through [`CascadeConfig::from_env_or_default`]; the
//! `with_parts` constructors take the configuration as given.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable selecting the [`DiagnosticMode`]
pub const DIAGNOSTICS_ENV: &str = "CASCADE_DIAGNOSTICS";

/// Whether advisory diagnostics are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticMode {
    /// Never report
    Off,
    /// Report through the configured sink
    #[default]
    Warn,
}

impl FromStr for DiagnosticMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" | "0" | "false" => Ok(Self::Off),
            "warn" | "on" | "1" | "true" => Ok(Self::Warn),
            _ => Err(ConfigError::InvalidValue {
                key: DIAGNOSTICS_ENV,
                value: s.to_string(),
            }),
        }
    }
}

/// Cascade configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Report unstable layer references
    pub diagnostics: DiagnosticMode,
    /// Longest layer rendering included in a diagnostic
    pub max_payload_chars: usize,
    /// Reuse the inherited snapshot when a layer changes nothing
    pub elide_noop_layers: bool,
}

impl CascadeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With diagnostic mode
    #[inline]
    #[must_use]
    pub fn with_diagnostics(mut self, mode: DiagnosticMode) -> Self {
        self.diagnostics = mode;
        self
    }

    /// With payload limit
    #[inline]
    #[must_use]
    pub fn with_max_payload_chars(mut self, max: usize) -> Self {
        self.max_payload_chars = max;
        self
    }

    /// With or without no-op elision
    #[inline]
    #[must_use]
    pub fn with_noop_elision(mut self, enabled: bool) -> Self {
        self.elide_noop_layers = enabled;
        self
    }

    /// Diagnostics on?
    #[inline]
    #[must_use]
    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics == DiagnosticMode::Warn
    }

    /// Parse JSON text; missing fields keep their defaults
    ///
    /// # Errors
    /// Returns error if the text is not valid configuration JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse TOML text; missing fields keep their defaults
    ///
    /// # Errors
    /// Returns error if the text is not valid configuration TOML
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Defaults overridden by the environment
    ///
    /// # Errors
    /// Returns error if `CASCADE_DIAGNOSTICS` holds an unknown value
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// [`CascadeConfig::from_env`], keeping the defaults on a bad value
    ///
    /// The rejected value is logged as a warning.
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_env().unwrap_or_else(|error| {
            tracing::warn!(%error, "ignoring invalid cascade environment");
            Self::default()
        })
    }

    /// Apply environment overrides to `self`
    ///
    /// # Errors
    /// Returns error if `CASCADE_DIAGNOSTICS` holds an unknown value
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        match std::env::var(DIAGNOSTICS_ENV) {
            Ok(raw) => self.with_diagnostics_override(&raw),
            Err(std::env::VarError::NotPresent) => Ok(self),
            Err(std::env::VarError::NotUnicode(raw)) => Err(ConfigError::InvalidValue {
                key: DIAGNOSTICS_ENV,
                value: raw.to_string_lossy().into_owned(),
            }),
        }
    }

    /// Apply a raw diagnostics setting
    ///
    /// # Errors
    /// Returns error if `raw` is not a known mode
    pub fn with_diagnostics_override(self, raw: &str) -> Result<Self, ConfigError> {
        Ok(self.with_diagnostics(raw.parse()?))
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            diagnostics: DiagnosticMode::Warn,
            max_payload_chars: 512,
            elide_noop_layers: true,
        }
    }
}
