use super::record::{DecodedRecord, InvalidRecord, RequiredField};
use super::tags::{
    get_string_value, get_u32_value, ECHO_NUMBERS, INSTANCE_NUMBER, PATIENT_NAME,
    SERIES_DESCRIPTION, SERIES_NUMBER,
};
use dicom_dictionary_std::tags::PIXEL_DATA;
use dicom_object::file::{OpenFileOptions, ReadPreamble};
use dicom_object::InMemDicomObject;
use dicom_transfer_syntax_registry::entries::IMPLICIT_VR_LITTLE_ENDIAN;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;

/// Decodes the placement fields of one record
///
/// Implementations must not panic on malformed input; anything that cannot
/// be decoded is reported as [`InvalidRecord`].
pub trait MetadataReader {
    fn read(&self, location: &Path) -> Result<DecodedRecord, InvalidRecord>;
}

/// [`MetadataReader`] backed by dicom-object
///
/// Reads are best effort: the 128-byte preamble is optional and parsing
/// stops before Pixel Data, since only header fields are needed. A file
/// without a file meta group is read as a bare implicit VR little endian
/// data set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DicomMetadataReader;

impl DicomMetadataReader {
    pub fn new() -> Self {
        Self
    }

    /// Decodes a record from an already-opened DICOM object
    ///
    /// Every missing required field is listed in the returned error, in
    /// [`RequiredField::ALL`] order.
    pub fn decode(dcm: &InMemDicomObject) -> Result<DecodedRecord, InvalidRecord> {
        let series_number = get_u32_value(dcm, SERIES_NUMBER);
        let series_description = get_string_value(dcm, SERIES_DESCRIPTION);
        let patient_identifier = get_string_value(dcm, PATIENT_NAME);
        let instance_number = get_u32_value(dcm, INSTANCE_NUMBER);

        match (
            series_number,
            series_description,
            patient_identifier,
            instance_number,
        ) {
            (
                Some(series_number),
                Some(series_description),
                Some(patient_identifier),
                Some(instance_number),
            ) => Ok(DecodedRecord {
                series_number,
                series_description,
                patient_identifier,
                instance_number,
                echo_number: get_u32_value(dcm, ECHO_NUMBERS),
            }),
            (sn, sd, pn, inst) => {
                let present = [sn.is_some(), sd.is_some(), pn.is_some(), inst.is_some()];
                let missing = RequiredField::ALL
                    .iter()
                    .zip(present)
                    .filter(|(_, present)| !present)
                    .map(|(field, _)| *field)
                    .collect();
                Err(InvalidRecord::MissingFields(missing))
            }
        }
    }
}

impl MetadataReader for DicomMetadataReader {
    fn read(&self, location: &Path) -> Result<DecodedRecord, InvalidRecord> {
        let opened = OpenFileOptions::new()
            .read_preamble(ReadPreamble::Auto)
            .read_until(PIXEL_DATA)
            .open_file(location);

        match opened {
            Ok(dcm) => Self::decode(&dcm),
            Err(e) => match read_bare_dataset(location) {
                Some(dcm) => Self::decode(&dcm),
                None => Err(InvalidRecord::Unreadable(e.to_string())),
            },
        }
    }
}

/// Reads a data set that has no preamble or file meta group
///
/// The first element header must declare a length that fits in the file, so
/// arbitrary non-DICOM files are rejected before the parser sizes a buffer.
fn read_bare_dataset(location: &Path) -> Option<InMemDicomObject> {
    let mut file = File::open(location).ok()?;
    let size = file.metadata().ok()?.len();

    let mut header = [0u8; 8];
    file.read_exact(&mut header).ok()?;
    let length = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if length != UNDEFINED_LENGTH && u64::from(length) > size - 8 {
        return None;
    }

    file.seek(SeekFrom::Start(0)).ok()?;
    InMemDicomObject::read_dataset_with_ts(
        BufReader::new(file),
        &IMPLICIT_VR_LITTLE_ENDIAN.erased(),
    )
    .ok()
}
