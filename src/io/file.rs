use std::path::Path;

use super::ProjectIoError;
use crate::calendar::parse_iso_date;
use crate::model::Project;

/// Save a project to a JSON file.
pub fn save_project(project: &Project, path: &Path) -> Result<(), ProjectIoError> {
    let json = serde_json::to_string_pretty(project).map_err(|source| ProjectIoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| ProjectIoError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a project from a JSON file. The start date must be a valid ISO
/// date; everything else is left for the layout engine to tolerate.
pub fn load_project(path: &Path) -> Result<Project, ProjectIoError> {
    let json = std::fs::read_to_string(path).map_err(|source| ProjectIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let project: Project = serde_json::from_str(&json).map_err(|source| ProjectIoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    parse_iso_date(&project.start_date)?;
    tracing::debug!(path = %path.display(), "project loaded");
    Ok(project)
}
