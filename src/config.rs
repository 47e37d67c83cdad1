use serde::Deserialize;
use serde::Serialize;

use crate::algorithm::Algorithm;
use crate::errors::Error;

/// Default number of bytes read from a file per streaming step.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

/// Knobs for a single digest run.
///
/// `chunk_size` only affects memory use. `algorithm` and `resolve_symlinks`
/// both change the resulting digest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct HashConfig {
    /// Algorithm used for file contents and for every directory combination.
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Maximum number of bytes of a file held in memory at once.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Canonicalize every entry before classifying it.
    #[serde(default = "default_true")]
    pub resolve_symlinks: bool,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_true() -> bool {
    true
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            resolve_symlinks: true,
        }
    }
}

impl HashConfig {
    /// Replaces the digest algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Replaces the read chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Turns symlink resolution on or off.
    pub fn with_resolve_symlinks(mut self, resolve_symlinks: bool) -> Self {
        self.resolve_symlinks = resolve_symlinks;
        self
    }

    /// Returns error if the configuration cannot drive a traversal.
    pub fn validate(&self) -> Result<(), Error> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidArgument(
                "chunk size must be a positive number of bytes".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let config = HashConfig::default();
        assert_eq!(config.algorithm, Algorithm::Md5);
        assert_eq!(config.chunk_size, 1_000_000);
        assert!(config.resolve_symlinks);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let config = HashConfig::default().with_chunk_size(0);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: HashConfig = serde_json::from_str(r#"{"algorithm": "sha256"}"#).unwrap();
        assert_eq!(
            config,
            HashConfig::default().with_algorithm(Algorithm::Sha256)
        );

        let config: HashConfig =
            serde_json::from_str(r#"{"resolve_symlinks": false, "chunk_size": 64}"#).unwrap();
        assert_eq!(
            config,
            HashConfig::default()
                .with_chunk_size(64)
                .with_resolve_symlinks(false)
        );
    }
}
