use std::fmt;
use thiserror::Error;

/// Header fields needed to place one DICOM file
///
/// Produced by a [`MetadataReader`](super::MetadataReader). All fields except
/// the echo number are required for a record to be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct DecodedRecord {
    /// SeriesNumber (0020,0011)
    pub series_number: u32,

    /// SeriesDescription (0008,103E), unsanitized
    pub series_description: String,

    /// PatientName (0010,0010), used verbatim in output names
    pub patient_identifier: String,

    /// InstanceNumber (0020,0013)
    pub instance_number: u32,

    /// First value of EchoNumbers (0018,0086), absent for single-echo acquisitions
    pub echo_number: Option<u32>,
}

impl DecodedRecord {
    pub fn new(
        series_number: u32,
        series_description: impl Into<String>,
        patient_identifier: impl Into<String>,
        instance_number: u32,
    ) -> Self {
        Self {
            series_number,
            series_description: series_description.into(),
            patient_identifier: patient_identifier.into(),
            instance_number,
            echo_number: None,
        }
    }

    /// Builder: set the echo number
    pub fn with_echo(mut self, echo_number: u32) -> Self {
        self.echo_number = Some(echo_number);
        self
    }
}

/// Required header fields of a placeable record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    SeriesNumber,
    SeriesDescription,
    PatientName,
    InstanceNumber,
}

impl RequiredField {
    pub const ALL: [RequiredField; 4] = [
        RequiredField::SeriesNumber,
        RequiredField::SeriesDescription,
        RequiredField::PatientName,
        RequiredField::InstanceNumber,
    ];

    /// Returns the DICOM keyword for this field
    pub fn keyword(&self) -> &'static str {
        match self {
            RequiredField::SeriesNumber => "SeriesNumber",
            RequiredField::SeriesDescription => "SeriesDescription",
            RequiredField::PatientName => "PatientName",
            RequiredField::InstanceNumber => "InstanceNumber",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Why a location could not be decoded into a [`DecodedRecord`]
///
/// This is a value, not a run failure: invalid records are reported and
/// skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRecord {
    /// The file could not be parsed as DICOM at all
    #[error("unreadable: {0}")]
    Unreadable(String),

    /// The file parsed but lacks required fields
    #[error("missing {}", join_fields(.0))]
    MissingFields(Vec<RequiredField>),
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(RequiredField::keyword)
        .collect::<Vec<_>>()
        .join(", ")
}
