use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Represents all possible errors in the dirhash crate.
///
/// None of these are recovered from internally. The first error hit anywhere
/// in a traversal aborts the whole digest.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub enum Error {
    /// The root path handed to the engine does not exist.
    #[error("No such file or directory: {path}")]
    NotFound {
        /// The missing path.
        path: String,
    },

    /// An entry is neither a regular file nor a directory, or could not be
    /// classified at all (broken symlink, permission-denied stat, ...).
    #[error("{path} is not a file or directory: {how}")]
    Classification {
        /// The offending entry.
        path: String,
        /// What the entry turned out to be, or why it could not be stat'ed.
        how: String,
    },

    /// Error indicating a failure to read data.
    #[error("Failed to read {what}: {how}")]
    Read {
        /// The item that failed to be read.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// The requested digest algorithm is not in the registry.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Error indicating an invalid argument was provided.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A resolved symlink points back at a directory that is still being
    /// hashed.
    #[error("Symlink cycle detected at {path}")]
    SymlinkCycle {
        /// The entry whose target is one of its own ancestors.
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_entry() {
        let err = Error::Classification {
            path: "/dev/null".into(),
            how: "character device".into(),
        };
        assert_eq!(
            err.to_string(),
            "/dev/null is not a file or directory: character device"
        );
        assert_eq!(
            Error::UnsupportedAlgorithm("crc32".into()).to_string(),
            "Unsupported algorithm: crc32"
        );
    }
}
