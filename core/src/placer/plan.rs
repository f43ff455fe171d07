use crate::error::Result;
use crate::layout::{with_suffix, Layout};
use crate::metadata::DecodedRecord;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// What currently sits at a candidate destination, relative to the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    /// Nothing there
    Free,
    /// A file with byte-identical contents
    Identical,
    /// Some other file or a directory
    Different,
}

/// A resolved target path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Nothing there yet; write here
    Free(PathBuf),
    /// The same bytes are already here; nothing to write
    AlreadyPlaced(PathBuf),
}

impl Destination {
    pub fn path(&self) -> &Path {
        match self {
            Destination::Free(path) | Destination::AlreadyPlaced(path) => path,
        }
    }
}

/// Placement decision for one record in the primary pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementPlan {
    /// Canonical destination is free
    Copy { destination: PathBuf },

    /// Canonical destination already holds this record
    AlreadyPlaced { destination: PathBuf },

    /// Canonical destination taken by another record; place under an
    /// echo-suffixed name and split the series later
    EchoFallback {
        collided: PathBuf,
        echo_number: u32,
        destination: Destination,
    },

    /// Canonical destination taken and no echo number to disambiguate
    Others {
        collided: PathBuf,
        destination: Destination,
    },
}

/// Decides where a record goes
///
/// `probe` reports what occupies a candidate path. No filesystem mutation
/// happens here.
pub fn plan_placement<P>(
    layout: &Layout,
    record: &DecodedRecord,
    source: &Path,
    mut probe: P,
) -> Result<PlacementPlan>
where
    P: FnMut(&Path) -> Result<Occupancy>,
{
    let primary = layout.primary_destination(record, source);

    match probe(&primary)? {
        Occupancy::Free => Ok(PlacementPlan::Copy {
            destination: primary,
        }),
        Occupancy::Identical => Ok(PlacementPlan::AlreadyPlaced {
            destination: primary,
        }),
        Occupancy::Different => match record.echo_number {
            Some(echo_number) => {
                let candidate = with_suffix(&primary, &echo_number.to_string());
                Ok(PlacementPlan::EchoFallback {
                    destination: resolve_destination(&candidate, &mut probe)?,
                    collided: primary,
                    echo_number,
                })
            }
            None => {
                let candidate = layout.others_destination(source);
                Ok(PlacementPlan::Others {
                    destination: resolve_destination(&candidate, &mut probe)?,
                    collided: primary,
                })
            }
        },
    }
}

/// Resolves a candidate path that must not clobber a different file
///
/// Tries `candidate`, then `_1`, `_2`, ... suffixed before the extension,
/// stopping at the first free or identical slot.
pub fn resolve_destination<P>(candidate: &Path, probe: &mut P) -> Result<Destination>
where
    P: FnMut(&Path) -> Result<Occupancy>,
{
    let mut attempt = candidate.to_path_buf();
    let mut counter: u32 = 0;
    loop {
        match probe(&attempt)? {
            Occupancy::Free => return Ok(Destination::Free(attempt)),
            Occupancy::Identical => return Ok(Destination::AlreadyPlaced(attempt)),
            Occupancy::Different => {
                counter += 1;
                attempt = with_suffix(candidate, &counter.to_string());
            }
        }
    }
}

/// Series folders that saw a collision, in first-flagged order, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlaggedSeries {
    order: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl FlaggedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the folder was already flagged
    pub fn insert(&mut self, folder: impl Into<PathBuf>) -> bool {
        let folder = folder.into();
        if self.seen.insert(folder.clone()) {
            self.order.push(folder);
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.order
    }
}
