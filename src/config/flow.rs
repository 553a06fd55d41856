use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::environment::{DEFAULT_MOBILE_IDENTIFIERS, DevicePatterns};
use crate::domain::registration::MAX_GROUPED_DISPLAY_LEN;

/// Tunables for the add-vehicle flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Simulated registry latency in milliseconds
    pub lookup_delay_ms: u64,
    /// Longest formatted string the input accepts
    pub max_display_len: usize,
    /// Refuse to submit plates that match no known grammar
    pub strict_validation: bool,
    /// Platform identifier fragments treated as mobile
    pub mobile_identifiers: Vec<String>,
}

impl FlowConfig {
    pub const DEFAULT_LOOKUP_DELAY_MS: u64 = 2000;
    pub const MAX_LOOKUP_DELAY_MS: u64 = 60_000;
    pub const DEFAULT_MAX_DISPLAY_LEN: usize = MAX_GROUPED_DISPLAY_LEN;

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validated()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "flow configuration loaded");
        Ok(config)
    }

    pub fn sanitize_lookup_delay(value: u64) -> u64 {
        value.min(Self::MAX_LOOKUP_DELAY_MS)
    }

    /// Checks cross-field constraints and clamps the lookup delay
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.max_display_len < MAX_GROUPED_DISPLAY_LEN {
            return Err(ConfigError::DisplayTooShort {
                len: self.max_display_len,
                required: MAX_GROUPED_DISPLAY_LEN,
            });
        }
        if self.device_patterns().is_empty() {
            return Err(ConfigError::NoMobileIdentifiers);
        }
        self.lookup_delay_ms = Self::sanitize_lookup_delay(self.lookup_delay_ms);
        Ok(self)
    }

    pub fn lookup_delay(&self) -> Duration {
        Duration::from_millis(self.lookup_delay_ms)
    }

    pub fn device_patterns(&self) -> DevicePatterns {
        DevicePatterns::new(&self.mobile_identifiers)
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            lookup_delay_ms: Self::DEFAULT_LOOKUP_DELAY_MS,
            max_display_len: Self::DEFAULT_MAX_DISPLAY_LEN,
            strict_validation: false,
            mobile_identifiers: DEFAULT_MOBILE_IDENTIFIERS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("max_display_len {len} cannot hold a grouped plate ({required} characters)")]
    DisplayTooShort { len: usize, required: usize },
    #[error("mobile_identifiers must contain at least one non-blank entry")]
    NoMobileIdentifiers,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_screen_behaviour() {
        let config = FlowConfig::default();
        assert_eq!(config.lookup_delay(), Duration::from_millis(2000));
        assert_eq!(config.max_display_len, 13);
        assert!(!config.strict_validation);
        assert_eq!(config.mobile_identifiers.len(), 8);
        assert_eq!(config.clone().validated().unwrap(), config);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        assert_eq!(FlowConfig::from_toml_str("").unwrap(), FlowConfig::default());
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = FlowConfig::from_toml_str(
            r#"
            lookup_delay_ms = 250
            strict_validation = true
            mobile_identifiers = ["KaiOS"]
            "#,
        )
        .unwrap();

        assert_eq!(config.lookup_delay(), Duration::from_millis(250));
        assert!(config.strict_validation);
        assert_eq!(config.max_display_len, 13);
        assert_eq!(config.mobile_identifiers, vec!["KaiOS".to_owned()]);
    }

    #[test]
    fn lookup_delay_is_clamped() {
        let config = FlowConfig::from_toml_str("lookup_delay_ms = 999999").unwrap();
        assert_eq!(config.lookup_delay_ms, FlowConfig::MAX_LOOKUP_DELAY_MS);
    }

    #[test]
    fn rejects_short_display() {
        let result = FlowConfig::from_toml_str("max_display_len = 8");
        assert!(matches!(
            result,
            Err(ConfigError::DisplayTooShort { len: 8, required: 13 })
        ));
    }

    #[test]
    fn rejects_blank_identifiers() {
        let result = FlowConfig::from_toml_str(r#"mobile_identifiers = ["", "  "]"#);
        assert!(matches!(result, Err(ConfigError::NoMobileIdentifiers)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let result = FlowConfig::from_toml_str("lookup_delay_ms = \"soon\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lookup_delay_ms = 10").unwrap();

        let config = FlowConfig::load(file.path()).unwrap();
        assert_eq!(config.lookup_delay_ms, 10);
    }

    #[test]
    fn missing_file_reports_path() {
        let result = FlowConfig::load("/definitely/not/here.toml");
        match result {
            Err(ConfigError::Io { path, .. }) => assert_eq!(path, PathBuf::from("/definitely/not/here.toml")),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
