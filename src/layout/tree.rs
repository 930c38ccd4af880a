use crate::ir::NodeKind;

use super::builder::FlowIndex;
use super::ranking::{Schedule, branch_priority};

/// Single-parent reduction of the flow DAG.
///
/// `parent_edge`/`children` form the sizing tree; `real_parents` keeps every
/// distinct main-flow source of a node and is only read for merge lanes.
pub(super) struct SpanningTree {
    pub(super) parent_edge: Vec<Option<usize>>,
    /// Tree children as (child, edge) pairs in sorted-edge order.
    pub(super) children: Vec<Vec<(usize, usize)>>,
    pub(super) real_parents: Vec<Vec<usize>>,
}

impl SpanningTree {
    pub(super) fn is_fan_out(&self, index: &FlowIndex<'_>, node: usize) -> bool {
        index.nodes[node].kind == NodeKind::Split && self.children[node].len() >= 2
    }
}

pub(super) fn reduce(index: &FlowIndex<'_>, schedule: &Schedule) -> SpanningTree {
    let node_count = index.nodes.len();
    let mut parent_edge = vec![None; node_count];
    let mut children = vec![Vec::new(); node_count];
    let mut real_parents: Vec<Vec<usize>> = vec![Vec::new(); node_count];

    for &node in &schedule.order {
        for &edge_idx in &schedule.sorted_outgoing[node] {
            let target = index.target(edge_idx);
            if !real_parents[target].contains(&node) {
                real_parents[target].push(node);
            }
            // Back edges of a cycle never become tree edges.
            if parent_edge[target].is_none()
                && target != node
                && schedule.comes_before(node, target)
            {
                parent_edge[target] = Some(edge_idx);
                children[node].push((target, edge_idx));
            }
        }
    }

    SpanningTree {
        parent_edge,
        children,
        real_parents,
    }
}

/// Lane-width requirement of every node's subtree, in lane units.
pub(super) fn measure_subtrees(
    index: &FlowIndex<'_>,
    schedule: &Schedule,
    tree: &SpanningTree,
) -> Vec<f32> {
    let mut sizes = vec![1.0f32; index.nodes.len()];
    for &node in schedule.order.iter().rev() {
        let kids = &tree.children[node];
        if kids.is_empty() {
            continue;
        }
        let child_sizes = kids.iter().map(|&(child, _)| sizes[child]);
        let size: f32 = if tree.is_fan_out(index, node) {
            child_sizes.sum()
        } else {
            child_sizes.fold(1.0, f32::max)
        };
        sizes[node] = size;
    }
    sizes
}

/// Tree children of a split ordered for left-to-right placement.
pub(super) fn branch_order(index: &FlowIndex<'_>, tree: &SpanningTree, node: usize) -> Vec<usize> {
    let mut kids = tree.children[node].clone();
    kids.sort_by_key(|&(_, edge_idx)| branch_priority(index.edge(edge_idx).label.as_deref()));
    kids.into_iter().map(|(child, _)| child).collect()
}
