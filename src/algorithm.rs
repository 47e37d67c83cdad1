//! The static registry of digest algorithms.
use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;

use crate::errors::Error;

/// A single-use streaming digest accumulator.
///
/// Created fresh by [`Algorithm::hasher`] for every file and every directory
/// combination step; finalizing consumes it.
pub trait StreamingHasher: Send {
    /// Feed more bytes into the running state.
    fn update(&mut self, data: &[u8]);

    /// Finish the digest and render it as lowercase hex.
    fn finalize_hex(self: Box<Self>) -> String;
}

struct RustCrypto<D>(D);

impl<D: Digest + Send> StreamingHasher for RustCrypto<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finalize_hex(self: Box<Self>) -> String {
        hex::encode(self.0.finalize())
    }
}

impl StreamingHasher for blake3::Hasher {
    fn update(&mut self, data: &[u8]) {
        blake3::Hasher::update(self, data);
    }

    fn finalize_hex(self: Box<Self>) -> String {
        self.finalize().to_hex().to_string()
    }
}

/// Digest algorithms a tree can be hashed with.
///
/// Algorithms are never mixed within one run: the same algorithm digests file
/// contents and every directory combination.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "String", try_from = "String")]
pub enum Algorithm {
    /// MD5, 16 byte digest.
    #[default]
    Md5,
    /// SHA-1, 20 byte digest.
    Sha1,
    /// SHA-224, 28 byte digest.
    Sha224,
    /// SHA-256, 32 byte digest.
    Sha256,
    /// SHA-384, 48 byte digest.
    Sha384,
    /// SHA-512, 64 byte digest.
    Sha512,
    /// BLAKE3 with its default 32 byte output.
    Blake3,
}

impl Algorithm {
    /// Every registered algorithm, in display order.
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Blake3,
    ];

    /// Canonical lowercase identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
            Algorithm::Blake3 => "blake3",
        }
    }

    /// Size of the raw digest in bytes. The hex rendering is twice as long.
    pub fn digest_len(&self) -> usize {
        match self {
            Algorithm::Md5 => 16,
            Algorithm::Sha1 => 20,
            Algorithm::Sha224 => 28,
            Algorithm::Sha256 | Algorithm::Blake3 => 32,
            Algorithm::Sha384 => 48,
            Algorithm::Sha512 => 64,
        }
    }

    /// Creates a fresh accumulator for this algorithm.
    pub fn hasher(&self) -> Box<dyn StreamingHasher> {
        match self {
            Algorithm::Md5 => Box::new(RustCrypto(md5::Md5::new())),
            Algorithm::Sha1 => Box::new(RustCrypto(sha1::Sha1::new())),
            Algorithm::Sha224 => Box::new(RustCrypto(sha2::Sha224::new())),
            Algorithm::Sha256 => Box::new(RustCrypto(sha2::Sha256::new())),
            Algorithm::Sha384 => Box::new(RustCrypto(sha2::Sha384::new())),
            Algorithm::Sha512 => Box::new(RustCrypto(sha2::Sha512::new())),
            Algorithm::Blake3 => Box::new(blake3::Hasher::new()),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Looks an algorithm up by name. Case, `-` and `_` are ignored, so
    /// `SHA-256` and `sha_256` both find `sha256`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Algorithm::ALL
            .into_iter()
            .find(|algo| algo.name() == normalized)
            .ok_or_else(|| Error::UnsupportedAlgorithm(s.to_string()))
    }
}

impl From<Algorithm> for String {
    fn from(algo: Algorithm) -> Self {
        algo.name().to_string()
    }
}

impl TryFrom<String> for Algorithm {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
