pub mod cli;
pub mod error;
pub mod fs;
pub mod layout;
pub mod metadata;
pub mod placer;

pub use cli::report::TextReport;
pub use error::{Result, SortError};
pub use fs::{FileSystem, StdFileSystem};
pub use metadata::{DecodedRecord, DicomMetadataReader, InvalidRecord, MetadataReader};
pub use placer::{Placer, SortOptions, SortReport};
