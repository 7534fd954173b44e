//! Shared configuration loader for the WEFT pipeline.
//!
//! `defaults/weft.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer a user file and
//! per-flag overrides on top of those defaults via [`Loader`] before
//! deserializing into [`WeftConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/weft.default.toml");

/// Top-level configuration consumed by WEFT pipeline binaries.
#[derive(Debug, Clone, Deserialize)]
pub struct WeftConfig {
    pub hyphenation: HyphenationConfig,
    pub markup: MarkupConfig,
    pub json: JsonConfig,
}

/// Hyphenator-related defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct HyphenationConfig {
    pub default_style: String,
}

/// Markup tokenizer defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkupConfig {
    pub default_begin_state: String,
}

/// `weft-json` diagnostic rendering defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonConfig {
    pub pretty: bool,
    pub indent_width: usize,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for CLI flags such as
    /// `weft-json --pretty`).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<WeftConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<WeftConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.hyphenation.default_style, "utf8");
        assert_eq!(config.markup.default_begin_state, "char");
        assert!(!config.json.pretty);
        assert_eq!(config.json.indent_width, 2);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("json.pretty", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(config.json.pretty);
    }

    #[test]
    fn optional_file_is_ignored_when_absent() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/path/weft.toml")
            .build()
            .expect("missing optional file should not error");
        assert_eq!(config.hyphenation.default_style, "utf8");
    }
}
