use serde::{Deserialize, Serialize};

/// Relationship between a predecessor and a dependent phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    #[default]
    #[serde(rename = "FS")]
    FinishToStart,
    #[serde(rename = "SS")]
    StartToStart,
    #[serde(rename = "FF")]
    FinishToFinish,
    #[serde(rename = "SF")]
    StartToFinish,
}

impl DependencyKind {
    /// Two-letter tag used in project files.
    pub fn tag(self) -> &'static str {
        match self {
            Self::FinishToStart => "FS",
            Self::StartToStart => "SS",
            Self::FinishToFinish => "FF",
            Self::StartToFinish => "SF",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_uppercase().as_str() {
            "FS" => Some(Self::FinishToStart),
            "SS" => Some(Self::StartToStart),
            "FF" => Some(Self::FinishToFinish),
            "SF" => Some(Self::StartToFinish),
            _ => None,
        }
    }
}

/// One entry of a phase's `dependsOn` list.
///
/// In JSON a bare id string is a finish-to-start dependency; the object
/// form `{ "id": "...", "type": "SS" }` selects another kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawDependency", into = "RawDependency")]
pub struct DependencyRef {
    pub id: String,
    pub kind: DependencyKind,
}

impl DependencyRef {
    pub fn finish_to_start(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: DependencyKind::FinishToStart,
        }
    }

    pub fn new(id: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawDependency {
    Id(String),
    Typed {
        id: String,
        #[serde(rename = "type", default)]
        kind: DependencyKind,
    },
}

impl From<RawDependency> for DependencyRef {
    fn from(raw: RawDependency) -> Self {
        match raw {
            RawDependency::Id(id) => Self::finish_to_start(id),
            RawDependency::Typed { id, kind } => Self { id, kind },
        }
    }
}

impl From<DependencyRef> for RawDependency {
    fn from(dep: DependencyRef) -> Self {
        match dep.kind {
            DependencyKind::FinishToStart => RawDependency::Id(dep.id),
            kind => RawDependency::Typed { id: dep.id, kind },
        }
    }
}

/// Reference schedule drawn alongside the live bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(rename = "startBD")]
    pub start_bd: i64,
    #[serde(rename = "durationBD")]
    pub duration_bd: u32,
}

/// A project phase positioned in business days from the project start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub name: String,
    /// Offset from the project start; 0 is the start date itself.
    #[serde(rename = "startBD")]
    pub start_bd: i64,
    /// Zero renders as a zero-width bar.
    #[serde(rename = "durationBD")]
    pub duration_bd: u32,
    /// Percent complete, 0 to 100.
    #[serde(default)]
    pub progress: f32,
    #[serde(default)]
    pub critical: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Baseline>,
    #[serde(default)]
    pub depends_on: Vec<DependencyRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    /// Display color as a CSS-style hex string, e.g. `#4285f4`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Phase {
    /// Create a phase with no progress, no dependencies and no metadata.
    pub fn new(id: impl Into<String>, name: impl Into<String>, start_bd: i64, duration_bd: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_bd,
            duration_bd,
            progress: 0.0,
            critical: false,
            baseline: None,
            depends_on: Vec::new(),
            assignees: Vec::new(),
            notes: String::new(),
            color: None,
        }
    }

    /// Add a finish-to-start predecessor.
    pub fn after(mut self, id: impl Into<String>) -> Self {
        self.depends_on.push(DependencyRef::finish_to_start(id));
        self
    }

    pub fn with_dependency(mut self, id: impl Into<String>, kind: DependencyKind) -> Self {
        self.depends_on.push(DependencyRef::new(id, kind));
        self
    }

    pub fn with_baseline(mut self, start_bd: i64, duration_bd: u32) -> Self {
        self.baseline = Some(Baseline {
            start_bd,
            duration_bd,
        });
        self
    }

    /// First business-day offset after the phase. Saturates at `i64::MAX`.
    pub fn end_bd(&self) -> i64 {
        self.start_bd.saturating_add(i64::from(self.duration_bd))
    }

    pub fn is_milestone(&self) -> bool {
        self.duration_bd == 0
    }
}
