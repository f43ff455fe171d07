//! Series/echo placement of DICOM records
//!
//! The [`Placer`] drives a run over any [`FileSystem`](crate::fs::FileSystem)
//! and [`MetadataReader`](crate::metadata::MetadataReader). Placement is
//! split into a pure planning step ([`plan_placement`]) and the mutation
//! that carries the plan out, so the decision logic can be tested without a
//! disk.
//!
//! # Example
//!
//! ```no_run
//! use dcmsort_core::{DicomMetadataReader, Placer, SortOptions, StdFileSystem};
//!
//! let options = SortOptions::new("/data/raw", "/data/sorted");
//! let placer = Placer::new(StdFileSystem::new(), DicomMetadataReader::new(), options);
//! let report = placer.run()?;
//! println!("placed {} files", report.placed);
//! # Ok::<(), dcmsort_core::SortError>(())
//! ```

mod options;
mod plan;
mod report;
mod sorter;

pub use options::SortOptions;
pub use plan::{
    plan_placement, resolve_destination, Destination, FlaggedSeries, Occupancy, PlacementPlan,
};
pub use report::{Issue, SortReport};
pub use sorter::Placer;
