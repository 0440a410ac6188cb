//! Typed configuration for the remote-image-list pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::errors::ConfigError;

fn default_cache_limit() -> usize {
    10
}

fn default_prefetch_n() -> usize {
    3
}

/// The `source` discriminant recognized by the `"list"` configuration
/// section (`SPEC_FULL.md` §6). Only `Www` is implemented by this crate;
/// other sources are out of scope (§1 Non-goals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Images come from the remote HTTP prefetch pipeline.
    #[default]
    Www,
}

/// Typed form of the `"list"` configuration section's recognized keys.
///
/// Deliberately `deny_unknown_fields`: an unrecognized key in the section
/// is a configuration author's mistake, not an extension point, matching
/// the `InvalidKey` semantics in `SPEC_FULL.md` §6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteImageListConfig {
    /// Must be `"www"` to enable this pipeline.
    #[serde(default)]
    pub source: ImageSource,

    /// Upstream URL the downloader issues a GET against.
    pub www_url: String,

    /// Directory the downloader mirrors response bodies into.
    #[serde(default)]
    pub www_cache: Option<PathBuf>,

    /// Ring capacity (`cache_size`). Must be at least 1.
    #[serde(default = "default_cache_limit")]
    pub www_cache_limit: usize,

    /// Target unseen-image count the worker maintains (`prefetch_n`). Must
    /// be at least 1; clamped to `www_cache_limit` if it overshoots.
    #[serde(default = "default_prefetch_n")]
    pub www_prefetch_n: usize,

    /// Enables mirroring each response body into `www_cache`.
    #[serde(default)]
    pub www_save_to_file: bool,

    /// Clears `www_cache` of non-directory entries at start and exit.
    #[serde(default)]
    pub www_cleanup_cache: bool,

    /// Path to a placeholder image shown when the ring has no navigable
    /// content.
    #[serde(default)]
    pub no_image_asset: Option<PathBuf>,
}

impl RemoteImageListConfig {
    /// Validates the recognized-key invariants this struct's fields cannot
    /// express on their own (`source` correctness, positivity of the two
    /// capacity knobs).
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] if `source` is not `www`, or
    /// if `www_cache_limit`/`www_prefetch_n` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source != ImageSource::Www {
            return Err(ConfigError::InvalidValue {
                key: "source".into(),
                reason: "only the \"www\" source is supported".into(),
            });
        }
        if self.www_cache_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "www_cache_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.www_prefetch_n == 0 {
            return Err(ConfigError::InvalidValue {
                key: "www_prefetch_n".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

impl Default for RemoteImageListConfig {
    fn default() -> Self {
        Self {
            source: ImageSource::Www,
            www_url: String::new(),
            www_cache: None,
            www_cache_limit: default_cache_limit(),
            www_prefetch_n: default_prefetch_n(),
            www_save_to_file: false,
            www_cleanup_cache: false,
            no_image_asset: None,
        }
    }
}
