//! A checksum, similar to a hash, for directories.
//!
//! Two directories hash the same exactly when they hold the same set of file
//! contents. File names, ordering, timestamps and permissions are ignored.
//! A file hashes to the digest of its bytes; a directory hashes to the digest
//! of its children's digests, sorted and joined with a single space.
//!
//! ```rust
//! # tokio_test::block_on(async {
//! # use dirhash::{Algorithm, HashConfig, TestRoot};
//! let first = TestRoot::empty().unwrap();
//! first.create_file("a", "x").unwrap();
//! first.create_file("b", "y").unwrap();
//!
//! let second = TestRoot::empty().unwrap();
//! second.create_file("m", "x").unwrap();
//! second.create_file("n", "y").unwrap();
//!
//! let config = HashConfig::default().with_algorithm(Algorithm::Sha256);
//! let a = dirhash::hash_entry(first.path(), &config).await.unwrap();
//! let b = dirhash::hash_entry(second.path(), &config).await.unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.len(), 64);
//! # })
//! ```
//!
//! The `dirhash` binary wraps [`hash_entry`] and prints the digest followed
//! by a newline:
//! ```text
//! $ dirhash --algo sha256 ./some/dir
//! 3f1c...
//! ```

mod algorithm;
mod config;
mod dir_hasher;
mod errors;
mod hash;

pub use algorithm::Algorithm;
pub use algorithm::StreamingHasher;
pub use config::DEFAULT_CHUNK_SIZE;
pub use config::HashConfig;
pub use dir_hasher::DirHasher;
pub use dir_hasher::combine_subhashes;
pub use dir_hasher::hash_dir;
pub use dir_hasher::hash_entry;
pub use dir_hasher::join_subhashes;
pub use errors::Error;

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "test_utils")]
pub(crate) mod test_utils;
#[cfg(feature = "test_utils")]
pub use test_utils::TestRoot;
