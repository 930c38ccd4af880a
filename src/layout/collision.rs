use crate::config::LayoutConfig;

use super::types::PositionedNode;

const MOVE_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct CollisionReport {
    pub(super) passes: usize,
    pub(super) residual: usize,
}

fn rows_overlap(a: &PositionedNode, b: &PositionedNode, tolerance: f32) -> bool {
    a.y < b.bottom() - tolerance && b.y < a.bottom() - tolerance
}

/// Horizontal shortfall between two nodes sharing a row band, if any.
fn deficit(a: &PositionedNode, b: &PositionedNode, config: &LayoutConfig) -> Option<f32> {
    if !rows_overlap(a, b, config.overlap_tolerance) {
        return None;
    }
    let required = (a.width + b.width) / 2.0 + config.collision_padding;
    let distance = (b.center_x() - a.center_x()).abs();
    let missing = required - distance;
    (missing > MOVE_EPSILON).then_some(missing)
}

pub(super) fn count_overlaps(nodes: &[PositionedNode], config: &LayoutConfig) -> usize {
    let mut count = 0;
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if deficit(&nodes[i], &nodes[j], config).is_some() {
                count += 1;
            }
        }
    }
    count
}

/// Symmetric pairwise relaxation along X with a fixed pass budget.
///
/// Each offending pair is pushed apart by half the deficit per side. Ties on
/// the center go by lane, then by list order, so the result stays
/// deterministic. Residual overlap after the budget is reported, not fixed.
pub(super) fn resolve_collisions(
    mut nodes: Vec<PositionedNode>,
    config: &LayoutConfig,
) -> (Vec<PositionedNode>, CollisionReport) {
    let mut passes = 0;
    for _ in 0..config.collision_passes {
        passes += 1;
        let mut moved = false;
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let Some(missing) = deficit(&nodes[i], &nodes[j], config) else {
                    continue;
                };
                let (left, right) = if (nodes[j].center_x() - nodes[i].center_x()).abs() > MOVE_EPSILON {
                    if nodes[j].center_x() > nodes[i].center_x() { (i, j) } else { (j, i) }
                } else if nodes[j].lane < nodes[i].lane {
                    (j, i)
                } else {
                    (i, j)
                };
                let push = missing / 2.0;
                nodes[left].x -= push;
                nodes[right].x += push;
                moved = true;
            }
        }
        if !moved {
            break;
        }
    }

    let residual = count_overlaps(&nodes, config);
    tracing::debug!(passes, residual, "collision relaxation finished");
    (nodes, CollisionReport { passes, residual })
}
