use super::builder::FlowIndex;
use super::ranking::Schedule;
use super::tree::{SpanningTree, branch_order};

/// Top-down lane assignment in scheduler order.
///
/// Split children fan out proportionally to their subtree sizes, centered
/// under the split. A node with several incoming edges is re-centered on the
/// mean lane of its real parents before its own children are placed.
pub(super) fn assign_lanes(
    index: &FlowIndex<'_>,
    schedule: &Schedule,
    tree: &SpanningTree,
    sizes: &[f32],
) -> Vec<f32> {
    let mut lanes: Vec<Option<f32>> = vec![None; index.nodes.len()];
    if let Some(entry) = schedule.entry() {
        lanes[entry] = Some(0.0);
    }

    for &node in &schedule.order {
        let mut lane = lanes[node].unwrap_or(0.0);
        if index.incoming[node].len() > 1 {
            let placed: Vec<f32> = tree.real_parents[node]
                .iter()
                .filter_map(|&parent| lanes[parent])
                .collect();
            if !placed.is_empty() {
                lane = placed.iter().sum::<f32>() / placed.len() as f32;
            }
        }
        lanes[node] = Some(lane);

        if tree.is_fan_out(index, node) {
            let branches = branch_order(index, tree, node);
            let total: f32 = branches.iter().map(|&child| sizes[child]).sum();
            let mut left = lane - total / 2.0;
            for child in branches {
                let width = sizes[child];
                lanes[child] = Some(left + width / 2.0);
                left += width;
            }
        } else {
            for &(child, _) in &tree.children[node] {
                lanes[child] = Some(lane);
            }
        }
    }

    lanes.into_iter().map(|lane| lane.unwrap_or(0.0)).collect()
}
