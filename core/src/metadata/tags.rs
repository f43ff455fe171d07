use dicom_core::Tag;
use dicom_object::InMemDicomObject;

// Series Identification Tags
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);

// Instance Tags
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
pub const ECHO_NUMBERS: Tag = Tag(0x0018, 0x0086);

// Patient Tags
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}

/// Helper to get an unsigned integer value from DICOM tag
///
/// Returns `None` if the tag is not present, is empty, or does not hold a
/// non-negative integer. Multi-valued elements yield their first value.
pub fn get_u32_value(dcm: &InMemDicomObject, tag: Tag) -> Option<u32> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<u32>().ok())
}
