//! Scratch file allocation for shards, worker outputs and transient
//! databases.
//!
//! Every transient file in the pipeline is named here, so ownership of a
//! path is always unambiguous: whoever received it from `allocate` (or was
//! explicitly handed it afterwards) is the one that deletes it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::Builder;

const SCRATCH_PREFIX: &str = "parablast_";

/// A single working directory that hands out unique file paths.
#[derive(Debug)]
pub struct ScratchSpace {
    dir: PathBuf,
}

impl ScratchSpace {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create a new, uniquely named, empty file and return its path.
    ///
    /// The random token in the name keeps allocated paths from colliding
    /// with each other, with pre-existing files, and from being a prefix
    /// of any user-supplied file in the directory.
    pub fn allocate(&self) -> Result<PathBuf> {
        let file = Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempfile_in(&self.dir)
            .with_context(|| format!("failed to create scratch file in {}", self.dir.display()))?;
        let (_, path) = file
            .keep()
            .context("failed to persist scratch file")?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn allocated_paths_are_unique_and_exist() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchSpace::new(dir.path());

        let mut seen = HashSet::new();
        for _ in 0..32 {
            let path = scratch.allocate().unwrap();
            assert!(path.exists());
            assert_eq!(path.parent(), Some(dir.path()));
            assert!(seen.insert(path), "allocator returned a duplicate path");
        }
    }

    #[test]
    fn allocated_names_carry_the_scratch_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchSpace::new(dir.path());

        let path = scratch.allocate().unwrap();
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(SCRATCH_PREFIX));
    }

    #[test]
    fn allocation_in_a_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchSpace::new(dir.path().join("nope"));
        assert!(scratch.allocate().is_err());
    }
}
