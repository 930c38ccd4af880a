use crate::error::FlowError;
use crate::ir::FlowGraph;

/// Reads a flow document: `{ "nodes": [...], "edges": [...] }`.
///
/// Plain JSON is tried first; JSON5 (comments, trailing commas, unquoted
/// keys) is accepted as a fallback for hand-written fixtures. No semantic
/// validation happens here: dangling ids and cycles are the layout's
/// business.
pub fn parse_flow(input: &str) -> Result<FlowGraph, FlowError> {
    match serde_json::from_str::<FlowGraph>(input) {
        Ok(graph) => Ok(graph),
        Err(json_err) => json5::from_str::<FlowGraph>(input).map_err(|json5_err| {
            tracing::debug!(%json_err, "flow is not plain JSON");
            FlowError::Flow(json5_err.to_string())
        }),
    }
}
