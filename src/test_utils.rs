use std::fs;
use std::fs::create_dir_all;
use std::io;
use std::path::Path as StdPath;
use std::path::PathBuf;

use tempdir::TempDir;

// File paths, contents and whether the entry is a directory, created in the
// temporary test root.
pub(crate) static TEMP_FILES: &[(&str, &str, bool)] = &[
    ("file1.txt", "alpha", false),
    ("file2.txt", "", false),
    ("dir1", "", true),
    ("dir1/file3.txt", "gamma", false),
    ("dir1/dir2", "", true),
    ("dir1/dir2/file4.txt", "delta", false),
    ("dir1/dir2/dir_empty1", "", true),
    ("dir3", "", true),
    ("dir3/file6.txt", "alpha", false),
];

/// Utility structure for managing a temporary test directory and its files.
#[derive(Debug)]
pub struct TestRoot {
    /// Root of the temporary test directory.
    pub root: TempDir,
}

impl TestRoot {
    /// Creates a `TestRoot` populated with the standard fixture tree.
    pub fn new() -> io::Result<Self> {
        let ret = Self::empty()?;
        for (relative_path, contents, is_dir) in TEMP_FILES {
            if *is_dir {
                ret.create_dir(relative_path)?;
            } else {
                ret.create_file(relative_path, contents)?;
            }
        }
        Ok(ret)
    }

    /// Creates a `TestRoot` with nothing in it.
    pub fn empty() -> io::Result<Self> {
        Ok(Self {
            root: TempDir::new("dirhash")?,
        })
    }

    /// Absolute path of the root directory.
    pub fn path(&self) -> &StdPath {
        self.root.path()
    }

    /// Absolute path of `relative_path` inside the root.
    pub fn join<P: AsRef<StdPath>>(&self, relative_path: P) -> PathBuf {
        self.root.path().join(relative_path)
    }

    /// Writes `content` to `relative_path`, creating parent directories.
    pub fn create_file<C: AsRef<[u8]>>(&self, relative_path: &str, content: C) -> io::Result<()> {
        let full_path = self.join(relative_path);
        if let Some(parent) = full_path.parent() {
            create_dir_all(parent)?;
        }
        fs::write(&full_path, content)
    }

    /// Creates `relative_path` and any missing parents.
    pub fn create_dir(&self, relative_path: &str) -> io::Result<()> {
        create_dir_all(self.join(relative_path))
    }

    /// Creates a symlink at `relative_link` pointing to `target`.
    #[cfg(unix)]
    pub fn create_symlink<P: AsRef<StdPath>>(&self, target: P, relative_link: &str) -> io::Result<()> {
        std::os::unix::fs::symlink(target, self.join(relative_link))
    }

    /// Copies the whole tree into a fresh `TestRoot`.
    pub fn duplicate(&self) -> io::Result<TestRoot> {
        let copy = TestRoot::empty()?;
        Self::copy_dir_all(self.path(), copy.path())?;
        Ok(copy)
    }

    /// Digest of the tree computed independently of the crate's engine.
    pub fn reference_md5(&self) -> io::Result<String> {
        cross_check::md5_tree(self.path())
    }

    fn copy_dir_all(src: impl AsRef<StdPath>, dst: impl AsRef<StdPath>) -> io::Result<()> {
        create_dir_all(&dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            let ty = entry.file_type()?;
            if ty.is_dir() {
                Self::copy_dir_all(entry.path(), dst.as_ref().join(entry.file_name()))?;
            } else {
                fs::copy(entry.path(), dst.as_ref().join(entry.file_name()))?;
            }
        }
        Ok(())
    }
}

// The functions in the mod are intentionally written with an
// alternative approach to ensure that the main logic of hashing
// trees is not broken.
mod cross_check {
    use std::fs;
    use std::io;
    use std::path::Path as StdPath;

    use md5::Digest;
    use md5::Md5;

    pub(super) fn md5_tree(path: &StdPath) -> io::Result<String> {
        if path.is_file() {
            return Ok(hex::encode(Md5::digest(fs::read(path)?)));
        }
        let mut subhashes = fs::read_dir(path)?
            .map(|entry| md5_tree(&entry?.path()))
            .collect::<io::Result<Vec<_>>>()?;
        subhashes.sort();
        Ok(hex::encode(Md5::digest(subhashes.join(" "))))
    }
}
