use std::collections::HashMap;

use crate::config::LayoutConfig;

use super::builder::FlowIndex;
use super::types::PositionedNode;

/// Places note/strategy nodes beside their targets.
///
/// Returns the main nodes followed by the annotations in input order.
pub(super) fn place_annotations(
    index: &FlowIndex<'_>,
    main: Vec<PositionedNode>,
    config: &LayoutConfig,
) -> Vec<PositionedNode> {
    let by_id: HashMap<String, usize> = main
        .iter()
        .enumerate()
        .map(|(slot, node)| (node.id.clone(), slot))
        .collect();
    let left_edge = main.iter().map(|node| node.x).reduce(f32::min).unwrap_or(0.0);

    let mut placed = main;
    for &side in &index.side {
        let source = index.nodes[side];
        let size = index.sizes[side];
        let anchor = index
            .side_target
            .get(&side)
            .and_then(|&target| by_id.get(index.id(target)))
            .map(|&slot| {
                let target = &placed[slot];
                (target.x, target.right(), target.y, target.lane)
            });

        let (x, y, lane) = match anchor {
            Some((_, right, y, lane)) if lane > 0.0 => (right + config.annotation_gap, y, lane),
            Some((left, _, y, lane)) => (left + config.annotation_left_offset, y, lane),
            None => {
                let y = placed
                    .iter()
                    .map(PositionedNode::bottom)
                    .reduce(f32::max)
                    .map_or(0.0, |lowest| lowest + config.row_spacing);
                (left_edge, y, 0.0)
            }
        };

        placed.push(PositionedNode {
            id: source.id.clone(),
            kind: source.kind.clone(),
            title: source.title.clone(),
            width: size.width,
            height: size.height,
            x,
            y,
            lane,
        });
    }
    placed
}
