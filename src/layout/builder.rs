use std::collections::HashMap;

use crate::config::{LayoutConfig, NodeSize};
use crate::ir::{Edge, FlowGraph, Node};

use super::error::{Diagnostics, LayoutIssue};

/// Arena view over a flow graph: nodes are addressed by their position in
/// `nodes`, edges by their position in the input edge list.
pub(super) struct FlowIndex<'a> {
    pub(super) nodes: Vec<&'a Node>,
    pub(super) edges: &'a [Edge],
    pub(super) lookup: HashMap<&'a str, usize>,
    pub(super) sizes: Vec<NodeSize>,
    /// Main nodes in input order.
    pub(super) main: Vec<usize>,
    /// Annotation nodes in input order.
    pub(super) side: Vec<usize>,
    /// Main-flow target of each attached annotation.
    pub(super) side_target: HashMap<usize, usize>,
    /// Main edges leaving each node, in input order.
    pub(super) outgoing: Vec<Vec<usize>>,
    /// Main edges entering each node, in input order.
    pub(super) incoming: Vec<Vec<usize>>,
    /// Resolved (from, to) node indices per edge.
    pub(super) endpoints: Vec<Option<(usize, usize)>>,
}

impl<'a> FlowIndex<'a> {
    pub(super) fn build(graph: &'a FlowGraph, config: &LayoutConfig, diag: &mut Diagnostics) -> Self {
        let mut nodes: Vec<&Node> = Vec::with_capacity(graph.nodes.len());
        let mut lookup: HashMap<&str, usize> = HashMap::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            if lookup.contains_key(node.id.as_str()) {
                diag.push(LayoutIssue::DuplicateNode {
                    id: node.id.clone(),
                });
                continue;
            }
            lookup.insert(node.id.as_str(), nodes.len());
            nodes.push(node);
        }

        let sizes = nodes
            .iter()
            .map(|node| node_size(node, config))
            .collect::<Vec<_>>();

        let mut main = Vec::new();
        let mut side = Vec::new();
        for (idx, node) in nodes.iter().enumerate() {
            if node.kind.is_side() {
                side.push(idx);
            } else {
                main.push(idx);
            }
        }

        let mut endpoints = Vec::with_capacity(graph.edges.len());
        for edge in &graph.edges {
            let from = lookup.get(edge.from.as_str()).copied();
            let to = lookup.get(edge.to.as_str()).copied();
            if from.is_none() {
                diag.push(LayoutIssue::DanglingEdge {
                    edge: edge.id.clone(),
                    missing: edge.from.clone(),
                });
            }
            if to.is_none() {
                diag.push(LayoutIssue::DanglingEdge {
                    edge: edge.id.clone(),
                    missing: edge.to.clone(),
                });
            }
            endpoints.push(from.zip(to));
        }

        let mut outgoing = vec![Vec::new(); nodes.len()];
        let mut incoming = vec![Vec::new(); nodes.len()];
        let mut side_edges: HashMap<usize, Vec<usize>> = HashMap::new();
        for (edge_idx, ends) in endpoints.iter().enumerate() {
            let Some((from, to)) = *ends else {
                continue;
            };
            if nodes[from].kind.is_side() {
                side_edges.entry(from).or_default().push(edge_idx);
                continue;
            }
            if nodes[to].kind.is_side() {
                continue;
            }
            outgoing[from].push(edge_idx);
            incoming[to].push(edge_idx);
        }

        let mut side_target = HashMap::new();
        for &idx in &side {
            // Dangling edges still count: an annotation pointing at nothing is detached.
            let declared = graph
                .edges
                .iter()
                .filter(|edge| edge.from == nodes[idx].id)
                .count();
            let resolved = side_edges.get(&idx).map(Vec::as_slice).unwrap_or(&[]);
            let target = match (declared, resolved) {
                (1, [edge_idx]) => endpoints[*edge_idx]
                    .map(|(_, to)| to)
                    .filter(|to| !nodes[*to].kind.is_side()),
                _ => None,
            };
            match target {
                Some(target) => {
                    side_target.insert(idx, target);
                }
                None => diag.push(LayoutIssue::DetachedAnnotation {
                    id: nodes[idx].id.clone(),
                    outgoing: declared,
                }),
            }
        }

        tracing::debug!(
            main = main.len(),
            side = side.len(),
            attached = side_target.len(),
            "indexed flow graph"
        );

        Self {
            nodes,
            edges: &graph.edges,
            lookup,
            sizes,
            main,
            side,
            side_target,
            outgoing,
            incoming,
            endpoints,
        }
    }

    pub(super) fn edge(&self, edge_idx: usize) -> &'a Edge {
        &self.edges[edge_idx]
    }

    /// Target node of a main edge. Main edges always resolve.
    pub(super) fn target(&self, edge_idx: usize) -> usize {
        self.endpoints[edge_idx].map(|(_, to)| to).unwrap_or(usize::MAX)
    }

    /// Source node of a main edge.
    pub(super) fn source(&self, edge_idx: usize) -> usize {
        self.endpoints[edge_idx].map(|(from, _)| from).unwrap_or(usize::MAX)
    }

    pub(super) fn id(&self, idx: usize) -> &'a str {
        self.nodes[idx].id.as_str()
    }
}

fn node_size(node: &Node, config: &LayoutConfig) -> NodeSize {
    let mut size = config.node_size(&node.kind);
    if node.kind == crate::ir::NodeKind::Message && node.has_strategy() {
        size.height += config.strategy_extra_height;
    }
    size
}
