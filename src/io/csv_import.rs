use std::path::Path;

use uuid::Uuid;

use super::ProjectIoError;
use crate::model::{Baseline, DependencyKind, DependencyRef, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Start,
    Duration,
    Progress,
    Critical,
    DependsOn,
    Assignees,
    Notes,
    Color,
    BaselineStart,
    BaselineDuration,
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "id" | "phaseid" | "key" => Some(Column::Id),

        "name" | "phase" | "phasename" | "task" | "label" | "title" => Some(Column::Name),

        "start" | "startbd" | "startday" | "offset" | "startoffset" => Some(Column::Start),

        "duration" | "durationbd" | "days" | "businessdays" | "length" => Some(Column::Duration),

        "progress" | "complete" | "percentcomplete" | "done" => Some(Column::Progress),

        "critical" | "iscritical" | "criticalpath" => Some(Column::Critical),

        "dependson" | "depends" | "dependencies" | "predecessors" | "after" => Some(Column::DependsOn),

        "assignees" | "assignee" | "owner" | "owners" | "resources" => Some(Column::Assignees),

        "notes" | "note" | "description" | "comment" | "comments" => Some(Column::Notes),

        "color" | "colour" => Some(Column::Color),

        "baselinestart" | "baselinestartbd" => Some(Column::BaselineStart),

        "baselineduration" | "baselinedurationbd" => Some(Column::BaselineDuration),

        _ => None,
    }
}

/// `"35"`, `"35%"` and `"35.5"` all parse; the result is clamped to 0..=100.
fn parse_progress(s: &str) -> Option<f32> {
    let s = s.trim().trim_end_matches('%').trim();
    if s.is_empty() {
        return Some(0.0);
    }
    s.parse::<f32>().ok().map(|p| p.clamp(0.0, 100.0))
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "y" | "1" | "critical")
}

/// `a|b:SS|c` → FS on a, SS on b, FS on c.
fn parse_dependencies(s: &str) -> Vec<DependencyRef> {
    s.split('|')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.rsplit_once(':') {
            Some((id, tag)) => match DependencyKind::from_tag(tag) {
                Some(kind) => DependencyRef::new(id.trim(), kind),
                None => DependencyRef::finish_to_start(entry),
            },
            None => DependencyRef::finish_to_start(entry),
        })
        .collect()
}

fn parse_list(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Import phases from a CSV file.
///
/// Returns `(phases, skipped_count)` on success.
pub fn import_csv(path: &Path) -> Result<(Vec<Phase>, usize), ProjectIoError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProjectIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_phases(&content)
}

/// Parse phases from CSV text.
///
/// Auto-detects delimiter (comma, semicolon, tab) and matches column
/// headers flexibly (`Phase Name`, `startBD`, `Duration` ...). Name,
/// start offset and duration are required; rows with a missing name, a
/// non-integer offset or a negative duration are skipped.
pub fn parse_phases(content: &str) -> Result<(Vec<Phase>, usize), ProjectIoError> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    let has = |col: Column| col_map.iter().any(|c| *c == Some(col));
    if !has(Column::Name) || !has(Column::Start) || !has(Column::Duration) {
        return Err(ProjectIoError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut phases: Vec<Phase> = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };

        let field = |col: Column| {
            col_map
                .iter()
                .position(|c| *c == Some(col))
                .and_then(|idx| record.get(idx))
                .map(str::trim)
        };

        let name = match field(Column::Name) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let start_bd = match field(Column::Start).and_then(|s| s.parse::<i64>().ok()) {
            Some(v) => v,
            None => {
                tracing::warn!(line, value = field(Column::Start).unwrap_or(""), "skipping row: invalid start offset");
                skipped += 1;
                continue;
            }
        };

        let duration_bd = match field(Column::Duration).and_then(|s| s.parse::<u32>().ok()) {
            Some(v) => v,
            None => {
                tracing::warn!(line, value = field(Column::Duration).unwrap_or(""), "skipping row: invalid duration");
                skipped += 1;
                continue;
            }
        };

        let id = field(Column::Id)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut phase = Phase::new(id, name, start_bd, duration_bd);
        phase.progress = field(Column::Progress).and_then(parse_progress).unwrap_or(0.0);
        phase.critical = field(Column::Critical).map(parse_flag).unwrap_or(false);
        phase.depends_on = field(Column::DependsOn).map(parse_dependencies).unwrap_or_default();
        phase.assignees = field(Column::Assignees).map(parse_list).unwrap_or_default();
        phase.notes = field(Column::Notes).unwrap_or("").to_string();
        phase.color = field(Column::Color).filter(|s| !s.is_empty()).map(str::to_string);

        let baseline_start = field(Column::BaselineStart).and_then(|s| s.parse::<i64>().ok());
        let baseline_duration = field(Column::BaselineDuration).and_then(|s| s.parse::<u32>().ok());
        if let (Some(start_bd), Some(duration_bd)) = (baseline_start, baseline_duration) {
            phase.baseline = Some(Baseline {
                start_bd,
                duration_bd,
            });
        }

        phases.push(phase);
    }

    if phases.is_empty() {
        return Err(ProjectIoError::NoPhases { skipped });
    }

    Ok((phases, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_semicolon_file_with_loose_headers() {
        let csv = "\
ID;Phase Name;Start BD;Duration;Progress;Critical;Depends On;Assignees
disc;Discovery;0;4;100%;yes;;Ana|Ben
des;Design;4;6;35;no;disc;Ana
build;Build;10;15;;true;des|disc:SS;
";
        let (phases, skipped) = parse_phases(csv).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(phases.len(), 3);

        assert_eq!(phases[0].id, "disc");
        assert_eq!(phases[0].progress, 100.0);
        assert!(phases[0].critical);
        assert_eq!(phases[0].assignees, vec!["Ana", "Ben"]);

        assert_eq!(phases[1].depends_on, vec![DependencyRef::finish_to_start("disc")]);
        assert_eq!(phases[1].progress, 35.0);

        assert_eq!(
            phases[2].depends_on,
            vec![
                DependencyRef::finish_to_start("des"),
                DependencyRef::new("disc", DependencyKind::StartToStart),
            ]
        );
        assert_eq!(phases[2].end_bd(), 25);
    }

    #[test]
    fn comma_file_generates_missing_ids() {
        let csv = "name,start,duration\nKickoff,0,0\nScoping,0,3\n";
        let (phases, _) = parse_phases(csv).unwrap();
        assert_eq!(phases.len(), 2);
        assert!(phases[0].is_milestone());
        assert!(Uuid::parse_str(&phases[0].id).is_ok());
        assert_ne!(phases[0].id, phases[1].id);
    }

    #[test]
    fn skips_bad_rows() {
        let csv = "name,start,duration\n,0,3\nA,x,3\nB,1,-2\nC,2,2\n";
        let (phases, skipped) = parse_phases(csv).unwrap();
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].name, "C");
        assert_eq!(skipped, 3);
    }

    #[test]
    fn reads_baseline_columns() {
        let csv = "name\tstart\tduration\tbaseline start\tbaseline duration\nA\t2\t5\t0\t4\n";
        let (phases, _) = parse_phases(csv).unwrap();
        assert_eq!(
            phases[0].baseline,
            Some(Baseline {
                start_bd: 0,
                duration_bd: 4
            })
        );
    }

    #[test]
    fn missing_required_columns() {
        let err = parse_phases("name,owner\nA,Ana\n").unwrap_err();
        assert!(matches!(err, ProjectIoError::MissingColumns { .. }));
    }

    #[test]
    fn all_rows_bad_is_an_error() {
        let err = parse_phases("name,start,duration\nA,?,1\n").unwrap_err();
        assert!(matches!(err, ProjectIoError::NoPhases { skipped: 1 }));
    }

    #[test]
    fn unknown_dependency_suffix_stays_in_id() {
        assert_eq!(
            parse_dependencies("ns:phase-1"),
            vec![DependencyRef::finish_to_start("ns:phase-1")]
        );
    }
}
