//! In-memory filesystem and text record reader for placer tests

use super::FileSystem;
use crate::error::{Result, SortError};
use crate::metadata::{DecodedRecord, InvalidRecord, MetadataReader, RequiredField};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Default)]
struct State {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    failing_destinations: HashSet<PathBuf>,
    ops: Vec<String>,
}

/// Shared-handle in-memory tree; clones see the same state
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryFileSystem {
    state: Rc<RefCell<State>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a file, creating its parent directories
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut state = self.state.borrow_mut();
        if let Some(parent) = path.parent() {
            insert_dir_all(&mut state.dirs, parent);
        }
        state.files.insert(path.to_path_buf(), contents.into());
    }

    /// Makes every copy or move onto `path` fail
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        self.state
            .borrow_mut()
            .failing_destinations
            .insert(path.as_ref().to_path_buf());
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.state.borrow().files.get(path.as_ref()).cloned()
    }

    /// All file paths, sorted
    pub fn files(&self) -> Vec<PathBuf> {
        self.state.borrow().files.keys().cloned().collect()
    }

    /// Mutating calls in the order they were made
    pub fn ops(&self) -> Vec<String> {
        self.state.borrow().ops.clone()
    }

    fn log(&self, op: String) {
        self.state.borrow_mut().ops.push(op);
    }

    fn check_writable(&self, source: &Path, destination: &Path) -> io::Result<()> {
        let state = self.state.borrow();
        if state.failing_destinations.contains(destination) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "injected failure"));
        }
        if state.files.contains_key(destination) || state.dirs.contains(destination) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "destination exists"));
        }
        if !state.files.contains_key(source) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "source missing"));
        }
        match destination.parent() {
            Some(parent) if !state.dirs.contains(parent) => {
                Err(io::Error::new(io::ErrorKind::NotFound, "parent missing"))
            }
            _ => Ok(()),
        }
    }
}

fn insert_dir_all(dirs: &mut BTreeSet<PathBuf>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        dirs.insert(ancestor.to_path_buf());
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let state = self.state.borrow();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.state.borrow().dirs.contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        if self.state.borrow().files.contains_key(path) {
            return Err(SortError::create_directory(
                path,
                io::Error::new(io::ErrorKind::AlreadyExists, "file in the way"),
            ));
        }
        insert_dir_all(&mut self.state.borrow_mut().dirs, path);
        self.log(format!("mkdir {}", path.display()));
        Ok(())
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<()> {
        self.check_writable(source, destination)
            .map_err(|e| SortError::copy(source, destination, e))?;
        let mut state = self.state.borrow_mut();
        let bytes = state.files[source].clone();
        state.files.insert(destination.to_path_buf(), bytes);
        drop(state);
        self.log(format!("copy {} {}", source.display(), destination.display()));
        Ok(())
    }

    fn rename(&self, source: &Path, destination: &Path) -> Result<()> {
        self.check_writable(source, destination)
            .map_err(|e| SortError::move_failed(source, destination, e))?;
        let mut state = self.state.borrow_mut();
        if let Some(bytes) = state.files.remove(source) {
            state.files.insert(destination.to_path_buf(), bytes);
        }
        drop(state);
        self.log(format!("move {} {}", source.display(), destination.display()));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        if self.state.borrow_mut().files.remove(path).is_none() {
            return Err(SortError::remove(
                path,
                io::Error::new(io::ErrorKind::NotFound, "no such file"),
            ));
        }
        self.log(format!("rm {}", path.display()));
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.dirs.contains(path) {
            return Err(SortError::remove(
                path,
                io::Error::new(io::ErrorKind::NotFound, "no such directory"),
            ));
        }
        state.dirs.retain(|d| !d.starts_with(path));
        state.files.retain(|f, _| !f.starts_with(path));
        drop(state);
        self.log(format!("rmtree {}", path.display()));
        Ok(())
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let state = self.state.borrow();
        if !state.dirs.contains(dir) {
            return Err(SortError::read_directory(
                dir,
                io::Error::new(io::ErrorKind::NotFound, "no such directory"),
            ));
        }
        Ok(state
            .files
            .keys()
            .filter(|f| f.parent() == Some(dir))
            .cloned()
            .collect())
    }

    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let state = self.state.borrow();
        if !state.dirs.contains(root) {
            return Err(SortError::read_directory(
                root,
                io::Error::new(io::ErrorKind::NotFound, "no such directory"),
            ));
        }
        Ok(state
            .files
            .keys()
            .filter(|f| f.starts_with(root))
            .cloned()
            .collect())
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let mut resolved = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                other => resolved.push(other),
            }
        }
        if !self.exists(&resolved) && !self.exists(path) {
            return Err(SortError::read_directory(
                path,
                io::Error::new(io::ErrorKind::NotFound, "no such path"),
            ));
        }
        Ok(resolved)
    }

    fn same_contents(&self, a: &Path, b: &Path) -> Result<bool> {
        let state = self.state.borrow();
        match (state.files.get(a), state.files.get(b)) {
            (Some(x), Some(y)) => Ok(x == y),
            _ => Err(io::Error::new(io::ErrorKind::NotFound, "no such file").into()),
        }
    }
}

/// Reads records stored as `key=value;...` text in a [`MemoryFileSystem`]
///
/// Keys: `series`, `desc`, `patient`, `instance`, `echo`. Any other content
/// (for instance a trailing `uid=` to make payloads distinct) is ignored.
pub(crate) struct TextRecordReader {
    fs: MemoryFileSystem,
}

impl TextRecordReader {
    pub fn new(fs: &MemoryFileSystem) -> Self {
        Self { fs: fs.clone() }
    }
}

impl MetadataReader for TextRecordReader {
    fn read(&self, location: &Path) -> std::result::Result<DecodedRecord, InvalidRecord> {
        let bytes = self
            .fs
            .contents(location)
            .ok_or_else(|| InvalidRecord::Unreadable("no such file".to_string()))?;
        let text = String::from_utf8(bytes).map_err(|e| InvalidRecord::Unreadable(e.to_string()))?;

        let fields: BTreeMap<&str, &str> = text
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .collect();
        let number = |key: &str| fields.get(key).and_then(|v| v.parse::<u32>().ok());
        let text_field = |key: &str| fields.get(key).map(|v| v.to_string());

        match (
            number("series"),
            text_field("desc"),
            text_field("patient"),
            number("instance"),
        ) {
            (Some(series), Some(desc), Some(patient), Some(instance)) => Ok(DecodedRecord {
                series_number: series,
                series_description: desc,
                patient_identifier: patient,
                instance_number: instance,
                echo_number: number("echo"),
            }),
            (series, desc, patient, instance) => {
                let present = [
                    series.is_some(),
                    desc.is_some(),
                    patient.is_some(),
                    instance.is_some(),
                ];
                Err(InvalidRecord::MissingFields(
                    RequiredField::ALL
                        .iter()
                        .zip(present)
                        .filter(|(_, present)| !present)
                        .map(|(field, _)| *field)
                        .collect(),
                ))
            }
        }
    }
}
