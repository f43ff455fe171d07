use super::FileSystem;
use crate::error::{Result, SortError};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use log::warn;
use walkdir::WalkDir;

const COMPARE_CHUNK: usize = 64 * 1024;

/// [`FileSystem`] over the real disk via `std::fs` and walkdir
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl StdFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so dangling links still count as occupied
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| SortError::create_directory(path, e))
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<()> {
        let mut reader = BufReader::new(
            File::open(source).map_err(|e| SortError::copy(source, destination, e))?,
        );
        // create_new refuses to clobber a file that appeared since the caller checked
        let dest = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
            .map_err(|e| SortError::copy(source, destination, e))?;

        let mut writer = BufWriter::new(dest);
        let written = io::copy(&mut reader, &mut writer).and_then(|_| writer.flush());
        if let Err(e) = written {
            drop(writer);
            // a truncated file must not occupy the slot on the next run
            if let Err(cleanup) = fs::remove_file(destination) {
                warn!(
                    "Could not remove partial copy {}: {}",
                    destination.display(),
                    cleanup
                );
            }
            return Err(SortError::copy(source, destination, e));
        }
        Ok(())
    }

    fn rename(&self, source: &Path, destination: &Path) -> Result<()> {
        if self.exists(destination) {
            return Err(SortError::move_failed(
                source,
                destination,
                io::Error::new(io::ErrorKind::AlreadyExists, "destination exists"),
            ));
        }
        fs::rename(source, destination).map_err(|e| SortError::move_failed(source, destination, e))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| SortError::remove(path, e))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).map_err(|e| SortError::remove(path, e))
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let entries = fs::read_dir(dir).map_err(|e| SortError::read_directory(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| SortError::read_directory(dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| SortError::read_directory(dir, e))?;
            if file_type.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                SortError::read_directory(path, io::Error::from(e))
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).map_err(|e| SortError::read_directory(path, e))
    }

    fn same_contents(&self, a: &Path, b: &Path) -> Result<bool> {
        if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
            return Ok(false);
        }

        let mut reader_a = BufReader::new(File::open(a)?);
        let mut reader_b = BufReader::new(File::open(b)?);
        let mut buf_a = vec![0u8; COMPARE_CHUNK];
        let mut buf_b = vec![0u8; COMPARE_CHUNK];

        loop {
            let read_a = read_full(&mut reader_a, &mut buf_a)?;
            let read_b = read_full(&mut reader_b, &mut buf_b)?;
            if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
                return Ok(false);
            }
            if read_a == 0 {
                return Ok(true);
            }
        }
    }
}

/// Fills `buf` as far as the reader allows, returning the byte count
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
