use crate::config::{LayoutConfig, PositionOverrides};

use super::types::PositionedNode;

/// Shifts the drawing so its top-left corner sits at `padding`, then applies
/// caller position overrides verbatim.
pub(super) fn normalize(
    mut nodes: Vec<PositionedNode>,
    config: &LayoutConfig,
    overrides: &PositionOverrides,
) -> Vec<PositionedNode> {
    let min_x = nodes.iter().map(|node| node.x).reduce(f32::min);
    let min_y = nodes.iter().map(|node| node.y).reduce(f32::min);
    if let (Some(min_x), Some(min_y)) = (min_x, min_y) {
        let dx = config.padding - min_x;
        let dy = config.padding - min_y;
        for node in &mut nodes {
            node.x += dx;
            node.y += dy;
        }
    }

    for node in &mut nodes {
        if let Some(point) = overrides.get(&node.id) {
            node.x = point.x;
            node.y = point.y;
        }
    }
    nodes
}

/// Overall drawing size including the trailing padding.
pub(super) fn extent(nodes: &[PositionedNode], config: &LayoutConfig) -> (f32, f32) {
    if nodes.is_empty() {
        return (0.0, 0.0);
    }
    let width = nodes.iter().map(PositionedNode::right).fold(0.0f32, f32::max);
    let height = nodes.iter().map(PositionedNode::bottom).fold(0.0f32, f32::max);
    (width + config.padding, height + config.padding)
}
