//! Error types for the cascade
//!
//! Composition itself cannot fail. Errors only arise at the boundary:
//! - Layers built from untyped input that is not a mapping of mappings
//! - Configuration that does not parse

/// Rejected layer input
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// Top-level value is not a mapping of component names
    #[error("layer must be a mapping of component names, found {found}")]
    NotAMapping {
        /// Kind of the value that was supplied
        found: &'static str,
    },

    /// A component entry is not a property mapping
    #[error("overrides for component `{component}` must be a mapping, found {found}")]
    ComponentNotAMapping {
        /// Component name
        component: String,
        /// Kind of the value that was supplied
        found: &'static str,
    },

    /// JSON text did not parse
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// YAML text did not parse
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

/// Rejected configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON configuration did not parse
    #[error("invalid JSON config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// TOML configuration did not parse
    #[error("invalid TOML config: {0}")]
    InvalidToml(#[from] toml::de::Error),

    /// A setting has an unrecognized value
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Setting name
        key: &'static str,
        /// Raw value
        value: String,
    },
}
