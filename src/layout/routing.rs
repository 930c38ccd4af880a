use std::collections::HashMap;

use crate::config::LayoutConfig;

use super::builder::FlowIndex;
use super::types::{Point, PositionedNode, RoutedEdge};

/// Centers closer than this are treated as one vertical line.
const ALIGN_TOLERANCE: f32 = 1.0;

/// Orthogonal polyline for a main-flow edge.
///
/// Aligned endpoints get a straight drop. Otherwise the path turns on a
/// horizontal line just above the target, which every edge entering that
/// node (or that row of split branches) shares.
pub(super) fn orthogonal_path(
    from: &PositionedNode,
    to: &PositionedNode,
    config: &LayoutConfig,
) -> Vec<Point> {
    let start = Point::new(from.center_x(), from.bottom());
    let end = Point::new(to.center_x(), to.y);
    if (start.x - end.x).abs() <= ALIGN_TOLERANCE {
        return vec![start, end];
    }
    let turn_y = to.y - config.edge_turn_offset;
    vec![
        start,
        Point::new(start.x, turn_y),
        Point::new(end.x, turn_y),
        end,
    ]
}

/// Connector from an annotation's right-middle to its target's left-middle.
pub(super) fn annotation_path(from: &PositionedNode, to: &PositionedNode) -> Vec<Point> {
    vec![
        Point::new(from.right(), from.y + from.height / 2.0),
        Point::new(to.x, to.y + to.height / 2.0),
    ]
}

pub(super) fn route_edges(
    index: &FlowIndex<'_>,
    nodes: &[PositionedNode],
    config: &LayoutConfig,
) -> Vec<RoutedEdge> {
    let by_id: HashMap<&str, &PositionedNode> =
        nodes.iter().map(|node| (node.id.as_str(), node)).collect();

    index
        .edges
        .iter()
        .map(|edge| {
            let points = match (by_id.get(edge.from.as_str()), by_id.get(edge.to.as_str())) {
                (Some(from), Some(to)) if from.kind.is_side() => annotation_path(from, to),
                (Some(from), Some(to)) => orthogonal_path(from, to, config),
                _ => Vec::new(),
            };
            RoutedEdge {
                id: edge.id.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
                label: edge.label.clone(),
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeKind;

    fn node(id: &str, kind: NodeKind, x: f32, y: f32) -> PositionedNode {
        PositionedNode {
            id: id.to_string(),
            kind,
            title: None,
            width: 200.0,
            height: 80.0,
            x,
            y,
            lane: 0.0,
        }
    }

    #[test]
    fn aligned_nodes_get_straight_drop() {
        let config = LayoutConfig::default();
        let a = node("a", NodeKind::Message, 0.0, 0.0);
        let b = node("b", NodeKind::Message, 0.5, 200.0);
        let points = orthogonal_path(&a, &b, &config);
        assert_eq!(points, vec![Point::new(100.0, 80.0), Point::new(100.5, 200.0)]);
    }

    #[test]
    fn converging_edge_turns_above_target() {
        let config = LayoutConfig::default();
        let a = node("a", NodeKind::Message, 0.0, 0.0);
        let b = node("b", NodeKind::Outcome, 300.0, 200.0);
        let points = orthogonal_path(&a, &b, &config);
        assert_eq!(points.len(), 4);
        assert_eq!(points[1], Point::new(100.0, 176.0));
        assert_eq!(points[2], Point::new(400.0, 176.0));
        assert_eq!(points[3], Point::new(400.0, 200.0));
    }

    #[test]
    fn split_branch_turns_above_branch_not_below_split() {
        let config = LayoutConfig::default();
        let s = node("s", NodeKind::Split, 0.0, 0.0);
        let b = node("b", NodeKind::Message, -300.0, 300.0);
        let points = orthogonal_path(&s, &b, &config);
        assert_eq!(points[1], Point::new(100.0, 276.0));
        assert_eq!(points[2], Point::new(-200.0, 276.0));
    }

    #[test]
    fn annotation_connector_joins_side_midpoints() {
        let note = node("n", NodeKind::Note, 0.0, 0.0);
        let target = node("m", NodeKind::Message, 300.0, 0.0);
        assert_eq!(
            annotation_path(&note, &target),
            vec![Point::new(200.0, 40.0), Point::new(300.0, 40.0)]
        );
    }
}
