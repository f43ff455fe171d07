//! Output tree naming rules
//!
//! Pure functions only; nothing here touches the filesystem.

use crate::metadata::DecodedRecord;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Top-level folder for collided records without an echo number
pub const OTHERS_FOLDER: &str = "others";

/// Echo sub-folder for records without an echo number
pub const ECHO_OTHERS_FOLDER: &str = "echo_others";

/// Extension of canonical output names
pub const DICOM_EXTENSION: &str = "dcm";

/// Replaces whitespace and path separators with underscores
///
/// # Example
///
/// ```
/// use dcmsort_core::layout::sanitize_description;
///
/// assert_eq!(sanitize_description("T1 AX/POST"), "T1_AX_POST");
/// ```
pub fn sanitize_description(description: &str) -> String {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = REGEX.get_or_init(|| Regex::new(r"[\s/\\]").expect("Failed to compile regex"));
    regex.replace_all(description, "_").into_owned()
}

/// Replaces path separators with underscores so a value stays one path component
///
/// # Example
///
/// ```
/// use dcmsort_core::layout::sanitize_file_component;
///
/// assert_eq!(sanitize_file_component("../../ESC"), ".._.._ESC");
/// ```
pub fn sanitize_file_component(value: &str) -> String {
    value.replace(['/', '\\'], "_")
}

/// Series folder name: `<series number:02>-<sanitized description>`
pub fn series_folder_name(record: &DecodedRecord) -> String {
    format!(
        "{:02}-{}",
        record.series_number,
        sanitize_description(&record.series_description)
    )
}

/// Canonical file name: `<patient>-<instance:03>.dcm`
///
/// The patient identifier is kept verbatim apart from path separators.
pub fn canonical_file_name(record: &DecodedRecord) -> String {
    format!(
        "{}-{:03}.{}",
        sanitize_file_component(&record.patient_identifier),
        record.instance_number,
        DICOM_EXTENSION
    )
}

/// Echo sub-folder name: `echo_<echo>` or `echo_others`
pub fn echo_folder_name(echo_number: Option<u32>) -> String {
    match echo_number {
        Some(echo) => format!("echo_{}", echo),
        None => ECHO_OTHERS_FOLDER.to_string(),
    }
}

/// Inserts `_<suffix>` before the extension of the final path component
///
/// Names without an extension get the suffix appended.
///
/// # Example
///
/// ```
/// use dcmsort_core::layout::with_suffix;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(with_suffix(Path::new("out/DOE-001.dcm"), "2"), PathBuf::from("out/DOE-001_2.dcm"));
/// assert_eq!(with_suffix(Path::new("out/IM0001"), "1"), PathBuf::from("out/IM0001_1"));
/// ```
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    path.with_file_name(name)
}

/// Resolves output locations for one run
#[derive(Debug, Clone)]
pub struct Layout {
    input_root: PathBuf,
    output_root: PathBuf,
    keep_name: bool,
}

impl Layout {
    pub fn new(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        keep_name: bool,
    ) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            keep_name,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn series_folder(&self, record: &DecodedRecord) -> PathBuf {
        self.output_root.join(series_folder_name(record))
    }

    pub fn others_folder(&self) -> PathBuf {
        self.output_root.join(OTHERS_FOLDER)
    }

    /// Primary destination of a record inside its series folder
    ///
    /// With `keep_name` this is the source path relative to the input root;
    /// sources outside the input root fall back to their base name.
    pub fn primary_destination(&self, record: &DecodedRecord, source: &Path) -> PathBuf {
        let series = self.series_folder(record);
        if self.keep_name {
            match source.strip_prefix(&self.input_root) {
                Ok(relative) => series.join(relative),
                Err(_) => series.join(base_name(source)),
            }
        } else {
            series.join(canonical_file_name(record))
        }
    }

    /// Fallback destination in the `others` folder, named by the source base name
    pub fn others_destination(&self, source: &Path) -> PathBuf {
        self.others_folder().join(base_name(source))
    }
}

fn base_name(path: &Path) -> PathBuf {
    path.file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("unnamed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("T1", "T1")]
    #[case("T1 MPRAGE", "T1_MPRAGE")]
    #[case("DWI/ADC", "DWI_ADC")]
    #[case("a\\b\tc", "a_b_c")]
    #[case("  ", "__")]
    fn test_sanitize_description(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_description(input), expected);
    }

    #[rstest]
    #[case(3, "T1", "03-T1")]
    #[case(12, "FLAIR AX", "12-FLAIR_AX")]
    #[case(101, "LOC", "101-LOC")]
    fn test_series_folder_name(#[case] number: u32, #[case] desc: &str, #[case] expected: &str) {
        let record = DecodedRecord::new(number, desc, "DOE", 1);
        assert_eq!(series_folder_name(&record), expected);
    }

    #[rstest]
    #[case(1, "DOE-001.dcm")]
    #[case(42, "DOE-042.dcm")]
    #[case(1234, "DOE-1234.dcm")]
    fn test_canonical_file_name(#[case] instance: u32, #[case] expected: &str) {
        let record = DecodedRecord::new(3, "T1", "DOE", instance);
        assert_eq!(canonical_file_name(&record), expected);
    }

    #[test]
    fn test_patient_identifier_used_verbatim() {
        let record = DecodedRecord::new(3, "T1", "DOE^JOHN", 7);
        assert_eq!(canonical_file_name(&record), "DOE^JOHN-007.dcm");
    }

    #[rstest]
    #[case("../../ESC", ".._.._ESC-001.dcm")]
    #[case("/etc/passwd", "_etc_passwd-001.dcm")]
    #[case("DOE\\JOHN", "DOE_JOHN-001.dcm")]
    fn test_canonical_file_name_strips_separators(#[case] patient: &str, #[case] expected: &str) {
        let record = DecodedRecord::new(3, "T1", patient, 1);
        assert_eq!(canonical_file_name(&record), expected);
    }

    #[test]
    fn test_primary_destination_stays_in_series_folder() {
        let layout = Layout::new("/in", "/out", false);
        let record = DecodedRecord::new(3, "T1", "../../ESC", 1);
        let destination = layout.primary_destination(&record, Path::new("/in/IM0001"));
        assert_eq!(destination, PathBuf::from("/out/03-T1/.._.._ESC-001.dcm"));
        assert_eq!(destination.parent(), Some(Path::new("/out/03-T1")));
    }

    #[test]
    fn test_echo_folder_name() {
        assert_eq!(echo_folder_name(Some(2)), "echo_2");
        assert_eq!(echo_folder_name(None), "echo_others");
    }

    #[rstest]
    #[case("a/DOE-001.dcm", "3", "a/DOE-001_3.dcm")]
    #[case("a/IM0001", "1", "a/IM0001_1")]
    #[case("a/scan.v2.dcm", "1", "a/scan.v2_1.dcm")]
    fn test_with_suffix(#[case] path: &str, #[case] suffix: &str, #[case] expected: &str) {
        assert_eq!(with_suffix(Path::new(path), suffix), PathBuf::from(expected));
    }

    #[test]
    fn test_primary_destination_canonical() {
        let layout = Layout::new("/in", "/out", false);
        let record = DecodedRecord::new(3, "T1 AX", "DOE", 1);
        assert_eq!(
            layout.primary_destination(&record, Path::new("/in/sub/IM0001")),
            PathBuf::from("/out/03-T1_AX/DOE-001.dcm")
        );
    }

    #[test]
    fn test_primary_destination_keep_name() {
        let layout = Layout::new("/in", "/out", true);
        let record = DecodedRecord::new(3, "T1", "DOE", 1);
        assert_eq!(
            layout.primary_destination(&record, Path::new("/in/sub/IM0001")),
            PathBuf::from("/out/03-T1/sub/IM0001")
        );
        assert_eq!(
            layout.primary_destination(&record, Path::new("/elsewhere/IM0002")),
            PathBuf::from("/out/03-T1/IM0002")
        );
    }

    #[test]
    fn test_others_destination() {
        let layout = Layout::new("/in", "/out", false);
        assert_eq!(
            layout.others_destination(Path::new("/in/sub/IM0001")),
            PathBuf::from("/out/others/IM0001")
        );
    }
}
