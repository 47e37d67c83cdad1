//! Streaming digestion of files and in-memory bytes.
use std::path::Path;

use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::algorithm::Algorithm;
use crate::algorithm::StreamingHasher;
use crate::errors::Error;

/// Feeds a source through a fresh accumulator, `chunk_size` bytes at a time.
///
/// `chunk_size` bounds memory use only; any positive value yields the same
/// digest.
pub(crate) trait DigestBuilder {
    /// Returns the accumulator with all of the source fed in, not yet
    /// finalized.
    async fn digest_build(
        &self,
        algorithm: Algorithm,
        chunk_size: usize,
    ) -> Result<Box<dyn StreamingHasher>, Error>;
}

/// Renders a finished accumulator.
pub(crate) trait HexDigest {
    /// Finalizes into a lowercase hex string.
    async fn hex_digest(self) -> Result<String, Error>;
}

impl HexDigest for Box<dyn StreamingHasher> {
    async fn hex_digest(self) -> Result<String, Error> {
        Ok(self.finalize_hex())
    }
}

impl DigestBuilder for &Path {
    async fn digest_build(
        &self,
        algorithm: Algorithm,
        chunk_size: usize,
    ) -> Result<Box<dyn StreamingHasher>, Error> {
        let read_error = |e: std::io::Error| Error::Read {
            what: self.to_string_lossy().to_string(),
            how: e.to_string(),
        };
        let mut file = fs::File::open(&self).await.map_err(read_error)?;
        let mut context = algorithm.hasher();
        let mut buffer = vec![0; chunk_size.max(1)];

        loop {
            let bytes_read = file.read(&mut buffer).await.map_err(read_error)?;

            if bytes_read == 0 {
                break; // End of file
            }
            context.update(&buffer[..bytes_read]);
        }
        Ok(context)
    }
}

impl DigestBuilder for &[u8] {
    async fn digest_build(
        &self,
        algorithm: Algorithm,
        chunk_size: usize,
    ) -> Result<Box<dyn StreamingHasher>, Error> {
        let mut context = algorithm.hasher();
        for chunk in self.chunks(chunk_size.max(1)) {
            context.update(chunk);
        }
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempdir::TempDir;

    use super::*;

    #[tokio::test]
    async fn chunk_size_does_not_change_file_digest() {
        let root = TempDir::new("hash").unwrap();
        let path = root.path().join("data.bin");
        let content: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&content)
            .unwrap();

        let mut context = Algorithm::Sha256.hasher();
        context.update(&content);
        let expected = context.finalize_hex();
        for chunk_size in [1, 7, 4096, 10_000, 1_000_000] {
            let digest = path
                .as_path()
                .digest_build(Algorithm::Sha256, chunk_size)
                .await
                .unwrap()
                .hex_digest()
                .await
                .unwrap();
            assert_eq!(digest, expected, "chunk_size {chunk_size}");
        }
    }

    #[tokio::test]
    async fn bytes_and_file_agree() {
        let root = TempDir::new("hash").unwrap();
        let path = root.path().join("data.txt");
        let content = b"d41d8cd98f00b204e9800998ecf8427e 900150983cd24fb0d6963f7d28e17f72";
        std::fs::write(&path, content).unwrap();

        for chunk_size in [1, 5, 32, 65, 4096] {
            for algo in Algorithm::ALL {
                let from_file = path
                    .as_path()
                    .digest_build(algo, chunk_size)
                    .await
                    .unwrap()
                    .hex_digest()
                    .await
                    .unwrap();
                let from_bytes = content
                    .as_slice()
                    .digest_build(algo, chunk_size)
                    .await
                    .unwrap()
                    .hex_digest()
                    .await
                    .unwrap();
                assert_eq!(from_bytes, from_file, "{algo} chunk_size {chunk_size}");
            }
        }
    }

    #[tokio::test]
    async fn empty_bytes_digest_empty_string() {
        let digest = b""
            .as_slice()
            .digest_build(Algorithm::Md5, 16)
            .await
            .unwrap()
            .hex_digest()
            .await
            .unwrap();
        assert_eq!(digest, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[tokio::test]
    async fn empty_file_digests_empty_bytes() {
        let root = TempDir::new("hash").unwrap();
        let path = root.path().join("empty");
        std::fs::write(&path, b"").unwrap();
        let digest = path
            .as_path()
            .digest_build(Algorithm::Md5, 16)
            .await
            .unwrap()
            .hex_digest()
            .await
            .unwrap();
        assert_eq!(digest, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let root = TempDir::new("hash").unwrap();
        let path = root.path().join("gone");
        let err = path
            .as_path()
            .digest_build(Algorithm::Md5, 16)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::Read { .. }));
    }
}
