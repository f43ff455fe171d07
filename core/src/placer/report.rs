use std::path::{Path, PathBuf};

/// A location paired with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Issue {
    pub location: PathBuf,
    pub message: String,
}

/// Outcome of a sorting run
///
/// Threaded through every placement step. `failures` is the run-wide
/// status consulted before the input root may be removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SortReport {
    /// Input files enumerated
    pub files_seen: usize,

    /// Series folders created by this run
    pub series_created: usize,

    /// Records copied to their canonical destination
    pub placed: usize,

    /// Records whose destination already held identical bytes
    pub already_placed: usize,

    /// Canonical destinations that were taken by a different record
    pub collisions: usize,

    /// Collided records copied under an echo-suffixed name
    pub echo_fallbacks: usize,

    /// Collided records copied into `others`
    pub others: usize,

    /// Records skipped for missing fields or unreadable content
    pub invalid: Vec<Issue>,

    /// Filesystem mutations that failed
    pub failures: Vec<Issue>,

    /// Series folders split into echo sub-folders, in processing order
    pub flagged_series: Vec<PathBuf>,

    /// Files moved into echo sub-folders
    pub moved_to_echo: usize,

    /// In-tree duplicates dropped because an identical copy already sat in the echo folder
    pub duplicates_removed: usize,

    /// Files left in a flagged series folder because they could not be re-decoded
    pub unsplit: Vec<PathBuf>,

    /// Whether the input root was deleted
    pub raw_removed: bool,

    /// Whether input removal was requested but withheld
    pub raw_removal_skipped: bool,
}

impl SortReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no filesystem mutation failed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn record_invalid(&mut self, location: &Path, message: impl ToString) {
        self.invalid.push(Issue {
            location: location.to_path_buf(),
            message: message.to_string(),
        });
    }

    pub fn record_failure(&mut self, location: &Path, message: impl ToString) {
        self.failures.push(Issue {
            location: location.to_path_buf(),
            message: message.to_string(),
        });
    }
}
