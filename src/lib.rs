#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, LayoutOptions, NodeSize, PositionOverrides, load_options, parse_options};
pub use error::FlowError;
pub use ir::{Edge, FlowGraph, Node, NodeKind};
pub use layout::{
    Layout, LayoutIssue, Point, PositionedNode, RoutedEdge, compute_layout,
    compute_layout_with_options, schedule_order,
};
pub use layout_dump::{LayoutDump, layout_to_json};
pub use parser::parse_flow;

/// One-shot string API: flow document + options document in, layout JSON out.
///
/// An empty `options` string means defaults.
pub fn layout_json(flow: &str, options: &str, pretty: bool) -> Result<String, FlowError> {
    let graph = parse_flow(flow)?;
    let options = parse_options(options)?;
    let layout = compute_layout_with_options(&graph, &options);
    layout_to_json(&layout, pretty)
}
