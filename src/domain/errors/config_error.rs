//! Errors surfaced while loading or persisting pipeline configuration.

use thiserror::Error;

/// Failure modes for the `"list"` configuration section.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration directory could not be determined.
    #[error("failed to determine config directory")]
    ConfigDirNotFound,

    /// I/O error reading or writing a configuration file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error.
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// TOML deserialization error, or an unrecognized/malformed key.
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// A key in the `"list"` section is not one this pipeline recognizes.
    #[error("invalid configuration key: {0}")]
    InvalidKey(String),

    /// A recognized key's value failed to parse into its expected type.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// The offending key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}
