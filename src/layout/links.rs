use serde::Serialize;

use super::projection::Projection;
use super::Row;
use crate::model::validate::index_by_id;
use crate::model::{DependencyKind, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Cubic Bézier from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPath {
    pub from: Point,
    pub control1: Point,
    pub control2: Point,
    pub to: Point,
}

impl LinkPath {
    /// S-curve that leaves and enters horizontally: both control points sit
    /// on the horizontal midpoint, each at its own endpoint's y.
    pub fn s_curve(from: Point, to: Point) -> Self {
        let mid_x = (from.x + to.x) / 2.0;
        Self {
            from,
            control1: Point::new(mid_x, from.y),
            control2: Point::new(mid_x, to.y),
            to,
        }
    }

    pub fn points(&self) -> [Point; 4] {
        [self.from, self.control1, self.control2, self.to]
    }

    /// SVG path data, e.g. `M 200 20 C 200 20, 200 60, 200 60`.
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.from.x,
            self.from.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.to.x,
            self.to.y
        )
    }
}

/// Curve geometry for one dependency edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Predecessor phase id.
    pub from_id: String,
    /// Dependent phase id.
    pub to_id: String,
    pub kind: DependencyKind,
    pub path: LinkPath,
}

/// Which bar edges a dependency kind connects: `(predecessor, successor)`,
/// `true` meaning the finish edge.
fn anchors(kind: DependencyKind) -> (bool, bool) {
    match kind {
        DependencyKind::FinishToStart => (true, false),
        DependencyKind::StartToStart => (false, false),
        DependencyKind::FinishToFinish => (true, true),
        DependencyKind::StartToFinish => (false, true),
    }
}

fn edge_x(row: &Row, finish: bool) -> f32 {
    if finish {
        row.end_x()
    } else {
        row.start_x
    }
}

/// One link per resolvable `dependsOn` entry, in phase order then entry
/// order. Entries naming an unknown id are dropped. This is a single pass
/// over declared edges, so cycles cost nothing extra.
pub(crate) fn build_links(phases: &[Phase], rows: &[Row], projection: &Projection<'_>) -> Vec<Link> {
    let index = index_by_id(phases);
    let mut links = Vec::new();

    for (succ_index, phase) in phases.iter().enumerate() {
        for dep in &phase.depends_on {
            let Some(&pred_index) = index.get(dep.id.as_str()) else {
                tracing::debug!(phase = %phase.id, missing = %dep.id, "dropping dependency on unknown phase");
                continue;
            };
            let (Some(pred_row), Some(succ_row)) = (rows.get(pred_index), rows.get(succ_index)) else {
                continue;
            };

            let (from_finish, to_finish) = anchors(dep.kind);
            let from = Point::new(edge_x(pred_row, from_finish), projection.row_center(pred_index));
            let to = Point::new(edge_x(succ_row, to_finish), projection.row_center(succ_index));

            links.push(Link {
                from_id: phases[pred_index].id.clone(),
                to_id: phase.id.clone(),
                kind: dep.kind,
                path: LinkPath::s_curve(from, to),
            });
        }
    }

    links
}
