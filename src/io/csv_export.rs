use std::path::Path;

use super::ProjectIoError;
use crate::layout::TimelineLayout;
use crate::model::Phase;

/// Export laid-out phases to a semicolon-delimited CSV file.
///
/// Columns: Phase ; Start Date ; End Date ; Business Days ; Progress ; Critical
/// Dates are the resolved ISO dates from the layout rows.
/// Returns the number of rows written.
pub fn export_csv(phases: &[Phase], layout: &TimelineLayout, path: &Path) -> Result<usize, ProjectIoError> {
    let file = std::fs::File::create(path).map_err(|source| ProjectIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(phases, layout, file)
}

pub fn write_csv<W: std::io::Write>(
    phases: &[Phase],
    layout: &TimelineLayout,
    writer: W,
) -> Result<usize, ProjectIoError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(["Phase", "Start Date", "End Date", "Business Days", "Progress", "Critical"])?;

    let mut written = 0;
    for row in &layout.rows {
        let Some(phase) = row.phase(phases) else {
            continue;
        };
        let days = phase.duration_bd.to_string();
        let progress = format!("{}%", row.progress.round());
        wtr.write_record([
            phase.name.as_str(),
            row.start_date.as_str(),
            row.end_date.as_str(),
            days.as_str(),
            progress.as_str(),
            if row.critical { "yes" } else { "no" },
        ])?;
        written += 1;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::HolidaySet;
    use crate::layout::TimelineEngine;
    use crate::model::ViewMode;

    #[test]
    fn writes_resolved_dates() {
        let mut design = Phase::new("b", "Design", 4, 6).after("a");
        design.progress = 35.4;
        design.critical = true;
        let phases = vec![Phase::new("a", "Discovery", 0, 4), design];
        let layout = TimelineEngine::default()
            .layout("2025-01-06", &phases, &HolidaySet::new(), ViewMode::Week)
            .unwrap();

        let mut out = Vec::new();
        let written = write_csv(&phases, &layout, &mut out).unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Phase;Start Date;End Date;Business Days;Progress;Critical\n\
             Discovery;2025-01-06;2025-01-10;4;0%;no\n\
             Design;2025-01-10;2025-01-20;6;35%;yes\n"
        );
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        let phases = vec![Phase::new("a", "Discovery", 0, 4)];
        let layout = TimelineEngine::default()
            .layout("2025-01-06", &phases, &HolidaySet::new(), ViewMode::Week)
            .unwrap();
        assert_eq!(export_csv(&phases, &layout, &path).unwrap(), 1);
        assert!(std::fs::read_to_string(&path).unwrap().contains("Discovery;2025-01-06"));
    }
}
