use crate::placer::SortReport;
use std::fmt;

/// Text report formatter for a sorting run
pub struct TextReport<'a> {
    report: &'a SortReport,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(report: &'a SortReport) -> Self {
        Self { report }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        writeln!(f, "DICOM Sort Report")?;
        writeln!(f, "=================")?;
        writeln!(f)?;
        writeln!(f, "Files seen:       {}", r.files_seen)?;
        writeln!(f, "Series created:   {}", r.series_created)?;
        writeln!(f, "Placed:           {}", r.placed)?;
        writeln!(f, "Already present:  {}", r.already_placed)?;
        writeln!(f, "Collisions:       {}", r.collisions)?;
        writeln!(f, "  echo fallbacks: {}", r.echo_fallbacks)?;
        writeln!(f, "  others:         {}", r.others)?;
        writeln!(f, "Invalid:          {}", r.invalid.len())?;
        writeln!(f)?;

        writeln!(f, "Echo Splitting")?;
        writeln!(f, "--------------")?;
        writeln!(f, "Series split:     {}", r.flagged_series.len())?;
        for series in &r.flagged_series {
            writeln!(f, "  {}", series.display())?;
        }
        writeln!(f, "Moved:            {}", r.moved_to_echo)?;
        writeln!(f, "Duplicates:       {}", r.duplicates_removed)?;
        writeln!(f, "Left in place:    {}", r.unsplit.len())?;
        writeln!(f)?;

        if !r.invalid.is_empty() {
            writeln!(f, "Skipped Files")?;
            writeln!(f, "-------------")?;
            for issue in &r.invalid {
                writeln!(f, "{}: {}", issue.location.display(), issue.message)?;
            }
            writeln!(f)?;
        }

        if !r.failures.is_empty() {
            writeln!(f, "Failures")?;
            writeln!(f, "--------")?;
            for issue in &r.failures {
                writeln!(f, "{}: {}", issue.location.display(), issue.message)?;
            }
            writeln!(f)?;
        }

        let raw = if r.raw_removed {
            "removed"
        } else if r.raw_removal_skipped {
            "kept (removal withheld)"
        } else {
            "kept"
        };
        writeln!(f, "Raw folder:       {}", raw)?;

        Ok(())
    }
}
