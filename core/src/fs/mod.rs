//! Filesystem capability used by the placer
//!
//! The placer never calls `std::fs` directly. It goes through [`FileSystem`]
//! so placement can be exercised against an in-memory tree.

#[cfg(test)]
pub(crate) mod memory;
mod std_fs;

pub use std_fs::StdFileSystem;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Filesystem primitives the placer relies on
pub trait FileSystem {
    /// Whether anything (file or directory) exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Creates `path` and any missing parents
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Copies file bytes to a destination that must not exist yet
    fn copy(&self, source: &Path, destination: &Path) -> Result<()>;

    /// Moves a file to a destination that must not exist yet
    fn rename(&self, source: &Path, destination: &Path) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Recursively deletes a directory tree
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// Regular files directly inside `dir`, sorted by path
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Regular files anywhere below `root`, sorted by path
    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>>;

    /// Absolute form of an existing path with `.`, `..` and links resolved
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Whether two files hold byte-identical contents
    fn same_contents(&self, a: &Path, b: &Path) -> Result<bool>;
}
