//! Namespace configuration for the issuer.

use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// Collection holding one counter document per namespace.
pub const COUNTERS_COLLECTION: &str = "counters";

/// Minimum number of digits in the numeric suffix of an issued ID.
pub const DEFAULT_PAD_WIDTH: usize = 6;

/// Default pad width for serde and builder defaults.
fn default_pad_width() -> usize {
    DEFAULT_PAD_WIDTH
}

/// Errors from validating issuer configuration.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// A configuration value was rejected.
    #[snafu(display("Invalid namespace config: {message}"))]
    Validation {
        /// Why the value was rejected.
        message: String,
    },
}

/// One counter stream: which namespace to count in and how to format the
/// identifiers issued from it.
///
/// # Example
///
/// ```
/// # use volreg_issuer::NamespaceConfig;
/// let config = NamespaceConfig::builder()
///     .namespace("volunteers".to_string())
///     .prefix("VOL".to_string())
///     .build()
///     .expect("valid namespace config");
/// assert_eq!(config.pad_width, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Counter document id within the counters collection.
    pub namespace: String,

    /// Prefix of issued identifiers, used verbatim.
    pub prefix: String,

    /// Minimum digits in the numeric suffix; wider values grow past it.
    #[serde(default = "default_pad_width")]
    pub pad_width: usize,
}

#[bon::bon]
impl NamespaceConfig {
    /// Creates a validated namespace configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the namespace or prefix is
    /// empty, or the pad width is zero.
    #[builder]
    pub fn new(
        namespace: String,
        prefix: String,
        #[builder(default = default_pad_width())] pad_width: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self { namespace, prefix, pad_width };
        config.validate()?;
        Ok(config)
    }
}

impl NamespaceConfig {
    /// Validates the configuration values.
    ///
    /// Call after deserialization to ensure values are within valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.is_empty() {
            return Err(ConfigError::Validation {
                message: "namespace must be non-empty".to_string(),
            });
        }
        if self.prefix.is_empty() {
            return Err(ConfigError::Validation {
                message: "prefix must be non-empty".to_string(),
            });
        }
        if self.pad_width == 0 {
            return Err(ConfigError::Validation {
                message: "pad_width must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_default_pad_width() {
        let config = NamespaceConfig::builder()
            .namespace("certificates".to_string())
            .prefix("CERT".to_string())
            .build()
            .unwrap();
        assert_eq!(config.pad_width, DEFAULT_PAD_WIDTH);
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let err = NamespaceConfig::builder()
            .namespace(String::new())
            .prefix("VOL".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn deserialization_fills_pad_width() {
        let config: NamespaceConfig =
            serde_json::from_str(r#"{"namespace":"volunteers","prefix":"VOL"}"#).unwrap();
        assert_eq!(config.pad_width, DEFAULT_PAD_WIDTH);
        assert!(config.validate().is_ok());
    }
}
