use crate::layout::Layout;
use std::path::PathBuf;

/// Configuration for one sorting run
///
/// # Example
///
/// ```
/// use dcmsort_core::SortOptions;
///
/// let options = SortOptions::new("/data/raw", "/data/sorted")
///     .with_keep_name(true)
///     .with_remove_raw(false);
///
/// assert!(options.keep_name);
/// assert!(!options.remove_raw);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct SortOptions {
    /// Root of the records to sort
    pub input_root: PathBuf,

    /// Destination root, created if absent
    pub output_root: PathBuf,

    /// Keep the original relative path instead of `<patient>-<instance>.dcm`
    pub keep_name: bool,

    /// Delete the input root after a run without failures
    pub remove_raw: bool,
}

impl SortOptions {
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            keep_name: false,
            remove_raw: false,
        }
    }

    /// Builder: preserve original relative names
    pub fn with_keep_name(mut self, enabled: bool) -> Self {
        self.keep_name = enabled;
        self
    }

    /// Builder: remove the input root after a successful run
    pub fn with_remove_raw(mut self, enabled: bool) -> Self {
        self.remove_raw = enabled;
        self
    }

    /// Naming rules for this run
    pub fn layout(&self) -> Layout {
        Layout::new(&self.input_root, &self.output_root, self.keep_name)
    }
}
