use std::collections::BTreeSet;

use crate::ir::NodeKind;

use super::builder::FlowIndex;

/// Ordering weight of a branch label: "yes" first, "no" second, the rest after.
pub(super) fn branch_priority(label: Option<&str>) -> u8 {
    match label.map(|label| label.trim().to_ascii_lowercase()) {
        Some(label) if label == "yes" => 0,
        Some(label) if label == "no" => 1,
        _ => 2,
    }
}

pub(super) struct Schedule {
    /// Every main node exactly once.
    pub(super) order: Vec<usize>,
    /// Slot of each node in `order`; `None` for annotation nodes.
    pub(super) position: Vec<Option<usize>>,
    /// Main edges per node sorted by branch priority, target id, edge id.
    pub(super) sorted_outgoing: Vec<Vec<usize>>,
    /// Nodes appended after the topological pass stalled.
    pub(super) unscheduled: Vec<usize>,
}

impl Schedule {
    pub(super) fn entry(&self) -> Option<usize> {
        self.order.first().copied()
    }

    pub(super) fn comes_before(&self, a: usize, b: usize) -> bool {
        match (self.position[a], self.position[b]) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }
}

pub(super) fn sort_outgoing(index: &FlowIndex<'_>, node: usize) -> Vec<usize> {
    let mut edges = index.outgoing[node].clone();
    edges.sort_by(|&a, &b| {
        let ea = index.edge(a);
        let eb = index.edge(b);
        branch_priority(ea.label.as_deref())
            .cmp(&branch_priority(eb.label.as_deref()))
            .then_with(|| ea.to.cmp(&eb.to))
            .then_with(|| ea.id.cmp(&eb.id))
    });
    edges
}

/// Kahn's algorithm with an id-ordered frontier so the result depends on ids
/// only, never on input order (except for the stalled tail).
pub(super) fn schedule(index: &FlowIndex<'_>) -> Schedule {
    let node_count = index.nodes.len();
    let sorted_outgoing: Vec<Vec<usize>> = (0..node_count)
        .map(|node| sort_outgoing(index, node))
        .collect();

    let mut remaining: Vec<usize> = index.incoming.iter().map(Vec::len).collect();
    let frontier_key = |node: usize| (index.id(node), node);
    let mut frontier: BTreeSet<(&str, usize)> = index
        .main
        .iter()
        .copied()
        .filter(|&node| remaining[node] == 0)
        .map(frontier_key)
        .collect();

    // Only the seed is trigger-biased; every later pop goes by id alone.
    let seed = frontier
        .iter()
        .copied()
        .find(|&(_, node)| index.nodes[node].kind == NodeKind::Trigger);
    let mut next = seed
        .and_then(|key| frontier.take(&key))
        .or_else(|| frontier.pop_first());

    let mut order = Vec::with_capacity(index.main.len());
    let mut position = vec![None; node_count];
    while let Some((_, node)) = next {
        position[node] = Some(order.len());
        order.push(node);
        for &edge_idx in &sorted_outgoing[node] {
            let target = index.target(edge_idx);
            if remaining[target] == 0 {
                continue;
            }
            remaining[target] -= 1;
            if remaining[target] == 0 {
                frontier.insert(frontier_key(target));
            }
        }
        next = frontier.pop_first();
    }

    let mut unscheduled = Vec::new();
    for &node in &index.main {
        if position[node].is_none() {
            position[node] = Some(order.len());
            order.push(node);
            unscheduled.push(node);
        }
    }

    tracing::debug!(
        scheduled = order.len() - unscheduled.len(),
        stalled = unscheduled.len(),
        "scheduled main nodes"
    );

    Schedule {
        order,
        position,
        sorted_outgoing,
        unscheduled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::FlowGraph;
    use crate::layout::error::Diagnostics;

    fn order_ids(graph: &FlowGraph) -> Vec<String> {
        let config = LayoutConfig::default();
        let mut diag = Diagnostics::default();
        let index = FlowIndex::build(graph, &config, &mut diag);
        let schedule = schedule(&index);
        schedule
            .order
            .iter()
            .map(|&node| index.id(node).to_string())
            .collect()
    }

    #[test]
    fn branch_priority_is_case_insensitive() {
        assert_eq!(branch_priority(Some("Yes")), 0);
        assert_eq!(branch_priority(Some(" NO ")), 1);
        assert_eq!(branch_priority(Some("maybe")), 2);
        assert_eq!(branch_priority(None), 2);
    }

    #[test]
    fn trigger_goes_first_even_with_larger_id() {
        let mut graph = FlowGraph::new();
        graph
            .node("a-orphan", NodeKind::Message)
            .node("z-trigger", NodeKind::Trigger)
            .node("m", NodeKind::Message)
            .edge("e1", "z-trigger", "m");
        assert_eq!(order_ids(&graph), vec!["z-trigger", "a-orphan", "m"]);
    }

    #[test]
    fn only_one_trigger_jumps_the_queue() {
        let mut graph = FlowGraph::new();
        graph
            .node("t2", NodeKind::Trigger)
            .node("b", NodeKind::Message)
            .node("t1", NodeKind::Trigger)
            .node("a", NodeKind::Wait);
        assert_eq!(order_ids(&graph), vec!["t1", "a", "b", "t2"]);
    }

    #[test]
    fn order_ignores_insertion_order() {
        let mut forward = FlowGraph::new();
        forward
            .node("t", NodeKind::Trigger)
            .node("b", NodeKind::Message)
            .node("a", NodeKind::Message)
            .edge("e1", "t", "a")
            .edge("e2", "t", "b");
        let mut reversed = FlowGraph::new();
        reversed
            .node("a", NodeKind::Message)
            .node("b", NodeKind::Message)
            .node("t", NodeKind::Trigger)
            .edge("e2", "t", "b")
            .edge("e1", "t", "a");
        assert_eq!(order_ids(&forward), order_ids(&reversed));
        assert_eq!(order_ids(&forward), vec!["t", "a", "b"]);
    }

    #[test]
    fn merge_waits_for_every_parent() {
        let mut graph = FlowGraph::new();
        graph
            .node("t", NodeKind::Trigger)
            .node("s", NodeKind::Split)
            .node("a", NodeKind::Message)
            .node("a2", NodeKind::Wait)
            .node("b", NodeKind::Message)
            .node("end", NodeKind::Outcome)
            .edge("e0", "t", "s")
            .labeled_edge("e1", "s", "b", "Yes")
            .labeled_edge("e2", "s", "a", "No")
            .edge("e3", "a", "a2")
            .edge("e4", "a2", "end")
            .edge("e5", "b", "end");
        let order = order_ids(&graph);
        let end = order.iter().position(|id| id == "end");
        let a2 = order.iter().position(|id| id == "a2");
        assert!(end > a2);
        assert_eq!(order.last().map(String::as_str), Some("end"));
    }

    #[test]
    fn cycle_members_are_appended_in_input_order() {
        let mut graph = FlowGraph::new();
        graph
            .node("t", NodeKind::Trigger)
            .node("y", NodeKind::Message)
            .node("x", NodeKind::Message)
            .edge("e1", "t", "x")
            .edge("e2", "x", "y")
            .edge("e3", "y", "x");
        let config = LayoutConfig::default();
        let mut diag = Diagnostics::default();
        let index = FlowIndex::build(&graph, &config, &mut diag);
        let schedule = schedule(&index);
        let ids: Vec<&str> = schedule.order.iter().map(|&n| index.id(n)).collect();
        assert_eq!(ids, vec!["t", "y", "x"]);
        assert_eq!(schedule.unscheduled.len(), 2);
    }

    #[test]
    fn sorted_outgoing_puts_yes_before_no() {
        let mut graph = FlowGraph::new();
        graph
            .node("s", NodeKind::Split)
            .node("a", NodeKind::Message)
            .node("b", NodeKind::Message)
            .node("c", NodeKind::Message)
            .edge("e0", "s", "a")
            .labeled_edge("e1", "s", "c", "No")
            .labeled_edge("e2", "s", "b", "yes");
        let config = LayoutConfig::default();
        let mut diag = Diagnostics::default();
        let index = FlowIndex::build(&graph, &config, &mut diag);
        let sorted: Vec<&str> = sort_outgoing(&index, 0)
            .into_iter()
            .map(|edge| index.edge(edge).id.as_str())
            .collect();
        assert_eq!(sorted, vec!["e2", "e1", "e0"]);
    }
}
