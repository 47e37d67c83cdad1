use std::fs::FileType;
use std::io::ErrorKind;
use std::path::Path as StdPath;
use std::path::PathBuf;

use async_recursion::async_recursion;
use futures_lite::StreamExt;
use log::debug;
use log::trace;
use tokio::fs;

use crate::Error;
use crate::algorithm::Algorithm;
use crate::config::HashConfig;
use crate::hash::DigestBuilder;
use crate::hash::HexDigest;

/// What an entry turned out to be once (optionally) resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    File(PathBuf),
    Directory(PathBuf),
}

/// Computes content digests of files and directory trees.
///
/// A directory's digest is the digest of its children's digests, sorted and
/// joined with a single space. Names, timestamps and permissions never reach
/// the hasher, so two trees holding the same files under different names
/// hash the same.
#[derive(Debug, Clone)]
pub struct DirHasher {
    config: HashConfig,
}

impl DirHasher {
    /// Creates a hasher, rejecting configurations that cannot drive a
    /// traversal.
    pub fn new(config: HashConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this hasher runs with.
    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Digest of whatever `path` is: file contents for a file, the composite
    /// digest for a directory. Anything else is a classification error.
    pub async fn hash_entry<P: AsRef<StdPath>>(&self, path: P) -> Result<String, Error> {
        let path = path.as_ref();
        ensure_exists(path).await?;
        match self.classify(path).await? {
            Entry::File(file) => self.hash_file(&file).await,
            Entry::Directory(dir) => self.hash_dir_recursive(&dir, &mut Vec::new()).await,
        }
    }

    /// Composite digest of the directory at `path`.
    ///
    /// Unlike [`DirHasher::hash_entry`] the root must be a directory.
    pub async fn hash_dir<P: AsRef<StdPath>>(&self, path: P) -> Result<String, Error> {
        let path = path.as_ref();
        ensure_exists(path).await?;
        match self.classify(path).await? {
            Entry::Directory(dir) => self.hash_dir_recursive(&dir, &mut Vec::new()).await,
            Entry::File(file) => Err(Error::Classification {
                path: file.display().to_string(),
                how: "not a directory".into(),
            }),
        }
    }

    /// Digest of the contents of the file at `path`, streamed in
    /// `chunk_size` reads.
    pub async fn hash_file<P: AsRef<StdPath>>(&self, path: P) -> Result<String, Error> {
        let path = path.as_ref();
        let digest = path
            .digest_build(self.config.algorithm, self.config.chunk_size)
            .await?
            .hex_digest()
            .await?;
        debug!("file {} {}", path.display(), digest);
        Ok(digest)
    }

    /// Resolves `path` if configured to, then stats it.
    async fn classify(&self, path: &StdPath) -> Result<Entry, Error> {
        let classification_error = |e: std::io::Error| Error::Classification {
            path: path.display().to_string(),
            how: e.to_string(),
        };
        let resolved = if self.config.resolve_symlinks {
            fs::canonicalize(path).await.map_err(classification_error)?
        } else {
            path.to_path_buf()
        };
        let file_type = fs::metadata(&resolved)
            .await
            .map_err(classification_error)?
            .file_type();

        if file_type.is_file() {
            Ok(Entry::File(resolved))
        } else if file_type.is_dir() {
            Ok(Entry::Directory(resolved))
        } else {
            Err(Error::Classification {
                path: path.display().to_string(),
                how: describe(&file_type).into(),
            })
        }
    }

    /// `ancestors` holds the directories currently being hashed above `dir`,
    /// `dir` excluded.
    #[async_recursion]
    async fn hash_dir_recursive(
        &self,
        dir: &StdPath,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<String, Error> {
        let mut entries = async_fs::read_dir(dir).await.map_err(|e| Error::Read {
            what: dir.display().to_string(),
            how: e.to_string(),
        })?;
        ancestors.push(dir.to_path_buf());

        let mut subhashes = Vec::new();
        while let Some(entry) = entries.next().await {
            let entry = entry.map_err(|e| Error::Read {
                what: dir.display().to_string(),
                how: e.to_string(),
            })?;
            let entry_path = entry.path();
            trace!("visiting {}", entry_path.display());

            let subhash = match self.classify(&entry_path).await? {
                Entry::File(file) => self.hash_file(&file).await?,
                Entry::Directory(child) => {
                    if self.config.resolve_symlinks && ancestors.contains(&child) {
                        return Err(Error::SymlinkCycle {
                            path: entry_path.display().to_string(),
                        });
                    }
                    self.hash_dir_recursive(&child, ancestors).await?
                }
            };
            subhashes.push(subhash);
        }

        ancestors.pop();
        let count = subhashes.len();
        let joined = join_subhashes(subhashes);
        let digest = joined
            .as_bytes()
            .digest_build(self.config.algorithm, self.config.chunk_size)
            .await?
            .hex_digest()
            .await?;
        debug!("dir {} ({} entries) {}", dir.display(), count, digest);
        Ok(digest)
    }
}

/// Sorts child digests byte-wise and joins them with a single ASCII space.
///
/// No children joins to the empty string.
pub fn join_subhashes(mut subhashes: Vec<String>) -> String {
    subhashes.sort_unstable();
    subhashes.join(" ")
}

/// Folds child digests into their parent's digest in one shot.
///
/// Hashes [`join_subhashes`] of `subhashes`. The result depends only on the
/// multiset of `subhashes`, never on their order.
pub fn combine_subhashes(algorithm: Algorithm, subhashes: Vec<String>) -> String {
    let mut context = algorithm.hasher();
    context.update(join_subhashes(subhashes).as_bytes());
    context.finalize_hex()
}

/// Digest of the file or directory at `path`. See [`DirHasher::hash_entry`].
pub async fn hash_entry<P: AsRef<StdPath>>(path: P, config: &HashConfig) -> Result<String, Error> {
    DirHasher::new(config.clone())?.hash_entry(path).await
}

/// Digest of the directory at `path`. See [`DirHasher::hash_dir`].
pub async fn hash_dir<P: AsRef<StdPath>>(path: P, config: &HashConfig) -> Result<String, Error> {
    DirHasher::new(config.clone())?.hash_dir(path).await
}

// Uses lstat so a dangling root symlink is reported as unclassifiable rather
// than missing.
async fn ensure_exists(path: &StdPath) -> Result<(), Error> {
    match fs::symlink_metadata(path).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound {
            path: path.display().to_string(),
        }),
        Err(e) => Err(Error::Classification {
            path: path.display().to_string(),
            how: e.to_string(),
        }),
    }
}

#[cfg(unix)]
fn describe(file_type: &FileType) -> &'static str {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_block_device() {
        "block device"
    } else if file_type.is_char_device() {
        "character device"
    } else if file_type.is_fifo() {
        "fifo"
    } else if file_type.is_socket() {
        "socket"
    } else if file_type.is_symlink() {
        "symlink"
    } else {
        "special file"
    }
}

#[cfg(not(unix))]
fn describe(file_type: &FileType) -> &'static str {
    if file_type.is_symlink() {
        "symlink"
    } else {
        "special file"
    }
}
