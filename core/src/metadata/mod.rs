//! Record metadata decoding
//!
//! Extracts the handful of header fields the sorter needs from a DICOM
//! file. Files that cannot be decoded are reported, never fatal.

mod reader;
mod record;
pub mod tags;

pub use reader::{DicomMetadataReader, MetadataReader};
pub use record::{DecodedRecord, InvalidRecord, RequiredField};
