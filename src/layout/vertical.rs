use crate::config::LayoutConfig;
use crate::ir::NodeKind;

use super::builder::FlowIndex;
use super::ranking::Schedule;

/// Row gap below `parent`; splits get extra room above their branches.
fn gap_below(index: &FlowIndex<'_>, parent: usize, config: &LayoutConfig) -> f32 {
    if index.nodes[parent].kind == NodeKind::Split {
        config.row_spacing * config.split_gap_multiplier
    } else {
        config.row_spacing
    }
}

/// Top Y of every main node: strictly below each already placed real parent.
pub(super) fn place_rows(index: &FlowIndex<'_>, schedule: &Schedule, config: &LayoutConfig) -> Vec<f32> {
    let mut ys: Vec<Option<f32>> = vec![None; index.nodes.len()];
    for &node in &schedule.order {
        let y = index.incoming[node]
            .iter()
            .map(|&edge_idx| index.source(edge_idx))
            .filter_map(|parent| {
                ys[parent].map(|parent_y| {
                    parent_y + index.sizes[parent].height + gap_below(index, parent, config)
                })
            })
            .fold(None, |acc: Option<f32>, y| Some(acc.map_or(y, |acc| acc.max(y))))
            .unwrap_or(0.0);
        ys[node] = Some(y);
    }
    ys.into_iter().map(|y| y.unwrap_or(0.0)).collect()
}
