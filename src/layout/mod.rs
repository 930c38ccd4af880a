mod annotation;
mod builder;
mod collision;
pub(crate) mod error;
mod lanes;
mod normalize;
mod ranking;
mod routing;
mod tree;
pub(crate) mod types;
mod vertical;
pub use error::LayoutIssue;
pub use types::*;
use annotation::*;
use builder::*;
use collision::*;
use error::*;
use lanes::*;
use normalize::*;
use ranking::*;
use routing::*;
use tree::*;
use vertical::*;

use crate::config::{LayoutConfig, LayoutOptions, PositionOverrides};
use crate::ir::FlowGraph;
use std::collections::HashMap;

/// Main-flow node ids in the order the layout processes them.
pub fn schedule_order(graph: &FlowGraph, config: &LayoutConfig) -> Vec<String> {
    let mut diag = Diagnostics::default();
    let index = FlowIndex::build(graph, config, &mut diag);
    schedule(&index)
        .order
        .iter()
        .map(|&node| index.id(node).to_string())
        .collect()
}

pub fn compute_layout_with_options(graph: &FlowGraph, options: &LayoutOptions) -> Layout {
    compute_layout(graph, &options.layout, &options.positions)
}

/// Lays out `graph` from scratch.
///
/// Never fails: malformed input (dangling edges, cycles, detached
/// annotations, duplicate ids) is handled by fallbacks that are listed in
/// [`Layout::issues`]. The result depends only on the arguments.
pub fn compute_layout(
    graph: &FlowGraph,
    config: &LayoutConfig,
    overrides: &PositionOverrides,
) -> Layout {
    let _span = tracing::debug_span!(
        "compute_layout",
        nodes = graph.nodes.len(),
        edges = graph.edges.len()
    )
    .entered();

    let mut diag = Diagnostics::default();
    let index = FlowIndex::build(graph, config, &mut diag);
    if index.nodes.is_empty() {
        let edges = route_edges(&index, &[], config);
        return Layout {
            edges,
            issues: diag.into_issues(),
            ..Layout::default()
        };
    }

    let schedule = schedule(&index);
    if !schedule.unscheduled.is_empty() {
        diag.push(LayoutIssue::Unscheduled {
            ids: schedule
                .unscheduled
                .iter()
                .map(|&node| index.id(node).to_string())
                .collect(),
        });
    }

    let tree = reduce(&index, &schedule);
    let sizes = measure_subtrees(&index, &schedule, &tree);
    let lanes = assign_lanes(&index, &schedule, &tree, &sizes);
    let rows = place_rows(&index, &schedule, config);

    let main = schedule
        .order
        .iter()
        .map(|&node| {
            let source = index.nodes[node];
            let size = index.sizes[node];
            PositionedNode {
                id: source.id.clone(),
                kind: source.kind.clone(),
                title: source.title.clone(),
                width: size.width,
                height: size.height,
                x: lanes[node] * config.lane_spacing - size.width / 2.0,
                y: rows[node],
                lane: lanes[node],
            }
        })
        .collect::<Vec<_>>();

    let (main, report) = resolve_collisions(main, config);
    if report.residual > 0 {
        diag.push(LayoutIssue::UnresolvedCollisions {
            passes: report.passes,
            overlaps: report.residual,
        });
    }

    let placed = place_annotations(&index, main, config);
    let placed = normalize(placed, config, overrides);
    let edges = route_edges(&index, &placed, config);
    let (width, height) = extent(&placed, config);

    // Hand nodes back in input order.
    let mut by_id: HashMap<String, PositionedNode> = placed
        .into_iter()
        .map(|node| (node.id.clone(), node))
        .collect();
    let nodes = index
        .nodes
        .iter()
        .filter_map(|node| by_id.remove(node.id.as_str()))
        .collect();

    tracing::debug!(width, height, "layout complete");

    Layout {
        nodes,
        edges,
        width,
        height,
        issues: diag.into_issues(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Node, NodeKind};

    fn split_flow() -> FlowGraph {
        let mut graph = FlowGraph::new();
        graph
            .node("trigger", NodeKind::Trigger)
            .node("split", NodeKind::Split)
            .node("yes-msg", NodeKind::Message)
            .node("yes-end", NodeKind::Outcome)
            .node("no-msg", NodeKind::Message)
            .node("no-end", NodeKind::Outcome)
            .edge("e0", "trigger", "split")
            .labeled_edge("e1", "split", "yes-msg", "Yes")
            .labeled_edge("e2", "split", "no-msg", "No")
            .edge("e3", "yes-msg", "yes-end")
            .edge("e4", "no-msg", "no-end");
        graph
    }

    #[test]
    fn empty_graph_keeps_edges_without_points() {
        let mut graph = FlowGraph::new();
        graph.edge("e1", "a", "b");
        let layout = compute_layout(&graph, &LayoutConfig::default(), &PositionOverrides::new());
        assert!(layout.nodes.is_empty());
        assert_eq!(layout.edges.len(), 1);
        assert!(layout.edges[0].points.is_empty());
        assert_eq!(layout.width, 0.0);
    }

    #[test]
    fn nodes_come_back_in_input_order() {
        let layout = compute_layout(&split_flow(), &LayoutConfig::default(), &PositionOverrides::new());
        let ids: Vec<&str> = layout.nodes.iter().map(|node| node.id.as_str()).collect();
        assert_eq!(ids, vec!["trigger", "split", "yes-msg", "yes-end", "no-msg", "no-end"]);
        assert!(layout.issues.is_empty());
    }

    #[test]
    fn split_branches_fan_left_and_right() {
        let layout = compute_layout(&split_flow(), &LayoutConfig::default(), &PositionOverrides::new());
        let split = layout.node("split").map(|node| node.center_x());
        let yes = layout.node("yes-msg").map(|node| node.center_x());
        let no = layout.node("no-msg").map(|node| node.center_x());
        assert!(yes < split);
        assert!(no > split);
    }

    #[test]
    fn split_branches_turn_just_above_their_row() {
        let config = LayoutConfig::default();
        let layout = compute_layout(&split_flow(), &config, &PositionOverrides::new());
        let yes = layout.edge("e1").map(|edge| edge.points.clone()).unwrap_or_default();
        let no = layout.edge("e2").map(|edge| edge.points.clone()).unwrap_or_default();
        assert_eq!(yes.len(), 4);
        assert_eq!(no.len(), 4);
        assert_eq!(yes[1].y, no[1].y);
        let yes_msg = layout.node("yes-msg").map(|node| node.y).unwrap_or_default();
        assert_eq!(yes[1].y, yes_msg - config.edge_turn_offset);
    }

    #[test]
    fn cycles_are_reported_and_still_placed() {
        let mut graph = FlowGraph::new();
        graph
            .node("a", NodeKind::Message)
            .node("b", NodeKind::Message)
            .edge("e1", "a", "b")
            .edge("e2", "b", "a");
        let layout = compute_layout(&graph, &LayoutConfig::default(), &PositionOverrides::new());
        assert_eq!(layout.nodes.len(), 2);
        assert!(matches!(layout.issues[0], LayoutIssue::Unscheduled { .. }));
        assert!(layout.edges.iter().all(|edge| edge.points.len() >= 2));
    }

    #[test]
    fn unknown_kinds_pass_through_with_default_size() {
        let mut graph = FlowGraph::new();
        graph.nodes.push(Node::new("hook", NodeKind::Other("webhook".into())).with_title("Hook"));
        let config = LayoutConfig::default();
        let layout = compute_layout(&graph, &config, &PositionOverrides::new());
        let node = &layout.nodes[0];
        assert_eq!(node.kind.as_str(), "webhook");
        assert_eq!(node.title.as_deref(), Some("Hook"));
        assert_eq!(node.width, config.default_node_size.width);
        assert_eq!((node.x, node.y), (config.padding, config.padding));
    }
}
