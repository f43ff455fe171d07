use super::options::SortOptions;
use super::plan::{
    plan_placement, resolve_destination, Destination, FlaggedSeries, Occupancy, PlacementPlan,
};
use super::report::SortReport;
use crate::error::{Result, SortError};
use crate::fs::FileSystem;
use crate::layout::{canonical_file_name, echo_folder_name, Layout};
use crate::metadata::{DecodedRecord, MetadataReader};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

/// Sorts a tree of DICOM files into series and echo folders
///
/// A run has three sequential stages:
///
/// 1. **Primary pass**: every input file, in lexicographic path order, is
///    decoded and copied into `<odir>/<NN>-<description>/`. Collisions fall
///    back to an echo-suffixed name (flagging the series) or to `others/`.
/// 2. **Disambiguation pass**: each flagged series folder has its direct
///    files moved into `echo_<N>/` or `echo_others/`.
/// 3. **Finalization**: the input root is removed when requested and the run
///    recorded no failures.
///
/// No destination is ever overwritten.
pub struct Placer<F, R> {
    fs: F,
    reader: R,
    options: SortOptions,
    layout: Layout,
}

impl<F: FileSystem, R: MetadataReader> Placer<F, R> {
    pub fn new(fs: F, reader: R, options: SortOptions) -> Self {
        let layout = options.layout();
        Self {
            fs,
            reader,
            options,
            layout,
        }
    }

    pub fn options(&self) -> &SortOptions {
        &self.options
    }

    /// Runs all stages and returns the report
    ///
    /// # Errors
    ///
    /// Only setup failures are returned as `Err`: a missing input root, an
    /// output root that cannot be created, or an input tree that cannot be
    /// walked. Per-record problems are collected in the report instead.
    pub fn run(&self) -> Result<SortReport> {
        let locations = self.prepare()?;

        let mut report = SortReport::new();
        report.files_seen = locations.len();
        info!(
            "Sorting {} files from {} into {}",
            locations.len(),
            self.options.input_root.display(),
            self.options.output_root.display()
        );

        let flagged = self.primary_pass(&locations, &mut report);
        self.disambiguate(&flagged, &mut report);
        self.finalize(&mut report);

        info!(
            "Done: {} placed, {} already present, {} collisions, {} invalid, {} failures",
            report.placed,
            report.already_placed,
            report.collisions,
            report.invalid.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Validates the roots and enumerates the input files
    ///
    /// Nothing is mutated when the input root is missing.
    fn prepare(&self) -> Result<Vec<PathBuf>> {
        let input = &self.options.input_root;
        if !self.fs.is_dir(input) {
            return Err(SortError::InputRootMissing {
                path: input.clone(),
            });
        }

        let output = &self.options.output_root;
        if !self.fs.is_dir(output) {
            self.fs.create_dir_all(output)?;
            debug!("Created output folder {}", output.display());
        }

        self.fs.walk_files(input)
    }

    /// Places every location and returns the series folders needing a split
    pub fn primary_pass(&self, locations: &[PathBuf], report: &mut SortReport) -> FlaggedSeries {
        let mut flagged = FlaggedSeries::new();

        for location in locations {
            debug!("File: {}", location.display());

            let record = match self.reader.read(location) {
                Ok(record) => record,
                Err(reason) => {
                    warn!("File: {} is skipped ({})", location.display(), reason);
                    report.record_invalid(location, &reason);
                    continue;
                }
            };

            if let Err(e) = self.place_record(location, &record, report, &mut flagged) {
                error!("{}", e);
                report.record_failure(location, &e);
            }
        }

        flagged
    }

    fn place_record(
        &self,
        location: &Path,
        record: &DecodedRecord,
        report: &mut SortReport,
        flagged: &mut FlaggedSeries,
    ) -> Result<()> {
        let series = self.layout.series_folder(record);
        if !self.fs.is_dir(&series) {
            self.fs.create_dir_all(&series)?;
            report.series_created += 1;
            info!("Create new series of dicoms: {}", series.display());
        }

        let plan = plan_placement(&self.layout, record, location, |candidate| {
            self.occupancy(location, candidate)
        })?;

        match plan {
            PlacementPlan::Copy { destination } => {
                self.copy_into_place(location, &destination)?;
                report.placed += 1;
            }
            PlacementPlan::AlreadyPlaced { destination } => {
                debug!(
                    "{} already placed at {}",
                    location.display(),
                    destination.display()
                );
                report.already_placed += 1;
            }
            PlacementPlan::EchoFallback {
                collided,
                echo_number,
                destination,
            } => {
                warn!(
                    "{} already exists with this new name {} (echo {})",
                    location.display(),
                    collided.display(),
                    echo_number
                );
                report.collisions += 1;
                flagged.insert(series);
                match destination {
                    Destination::Free(path) => {
                        self.copy_into_place(location, &path)?;
                        report.echo_fallbacks += 1;
                    }
                    Destination::AlreadyPlaced(_) => report.already_placed += 1,
                }
            }
            PlacementPlan::Others {
                collided,
                destination,
            } => {
                warn!(
                    "{} already exists with this new name {} (no echo number, using {})",
                    location.display(),
                    collided.display(),
                    destination.path().display()
                );
                report.collisions += 1;
                match destination {
                    Destination::Free(path) => {
                        self.copy_into_place(location, &path)?;
                        report.others += 1;
                    }
                    Destination::AlreadyPlaced(_) => report.already_placed += 1,
                }
            }
        }

        Ok(())
    }

    /// Splits each flagged series folder into echo sub-folders
    ///
    /// Each folder is listed once, when visited; only its direct files move.
    pub fn disambiguate(&self, flagged: &FlaggedSeries, report: &mut SortReport) {
        for series in flagged.iter() {
            info!("Splitting {} by echo number", series.display());
            report.flagged_series.push(series.clone());

            let files = match self.fs.list_files(series) {
                Ok(files) => files,
                Err(e) => {
                    error!("{}", e);
                    report.record_failure(series, &e);
                    continue;
                }
            };

            for file in files {
                if let Err(e) = self.split_file(series, &file, report) {
                    error!("{}", e);
                    report.record_failure(&file, &e);
                }
            }
        }
    }

    fn split_file(&self, series: &Path, file: &Path, report: &mut SortReport) -> Result<()> {
        let record = match self.reader.read(file) {
            Ok(record) => record,
            Err(reason) => {
                warn!(
                    "Leaving {} in place, cannot re-read it ({})",
                    file.display(),
                    reason
                );
                report.unsplit.push(file.to_path_buf());
                return Ok(());
            }
        };

        let echo_folder = series.join(echo_folder_name(record.echo_number));
        if !self.fs.is_dir(&echo_folder) {
            self.fs.create_dir_all(&echo_folder)?;
            debug!("Created {}", echo_folder.display());
        }

        let target = echo_folder.join(canonical_file_name(&record));
        match resolve_destination(&target, &mut |candidate: &Path| {
            self.occupancy(file, candidate)
        })? {
            Destination::Free(path) => {
                self.fs.rename(file, &path)?;
                debug!("Move file {} to {}", file.display(), path.display());
                report.moved_to_echo += 1;
            }
            Destination::AlreadyPlaced(path) => {
                self.fs.remove_file(file)?;
                debug!(
                    "Dropped {}, identical to {}",
                    file.display(),
                    path.display()
                );
                report.duplicates_removed += 1;
            }
        }

        Ok(())
    }

    /// Removes the input root if requested and the run had no failures
    fn finalize(&self, report: &mut SortReport) {
        if !self.options.remove_raw {
            return;
        }

        let input = &self.options.input_root;
        if !report.is_success() {
            error!(
                "Keeping RAW folder {}: {} failure(s) during the run",
                input.display(),
                report.failures.len()
            );
            report.raw_removal_skipped = true;
            return;
        }

        match self.output_inside_input() {
            Ok(false) => {}
            Ok(true) => {
                error!(
                    "Keeping RAW folder {}: output folder {} lies inside it",
                    input.display(),
                    self.options.output_root.display()
                );
                report.raw_removal_skipped = true;
                return;
            }
            Err(e) => {
                error!("Keeping RAW folder {}: {}", input.display(), e);
                report.raw_removal_skipped = true;
                return;
            }
        }

        match self.fs.remove_dir_all(input) {
            Ok(()) => {
                info!("Remove RAW folder: {}", input.display());
                report.raw_removed = true;
            }
            Err(e) => {
                error!("{}", e);
                report.record_failure(input, &e);
            }
        }
    }

    /// Compares the resolved roots, so `..` segments and links cannot hide nesting
    fn output_inside_input(&self) -> Result<bool> {
        let input = self.fs.canonicalize(&self.options.input_root)?;
        let output = self.fs.canonicalize(&self.options.output_root)?;
        Ok(output.starts_with(&input))
    }

    fn copy_into_place(&self, source: &Path, destination: &Path) -> Result<()> {
        if let Some(parent) = destination.parent() {
            if !self.fs.is_dir(parent) {
                self.fs.create_dir_all(parent)?;
            }
        }
        self.fs.copy(source, destination)?;
        debug!(
            "Copy file {} to {}",
            source.display(),
            destination.display()
        );
        Ok(())
    }

    fn occupancy(&self, source: &Path, candidate: &Path) -> Result<Occupancy> {
        if !self.fs.exists(candidate) {
            Ok(Occupancy::Free)
        } else if self.fs.is_dir(candidate) {
            Ok(Occupancy::Different)
        } else if self.fs.same_contents(source, candidate)? {
            Ok(Occupancy::Identical)
        } else {
            Ok(Occupancy::Different)
        }
    }
}
