use crate::error::FlowError;
use crate::ir::NodeKind;
use crate::layout::Point;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Node id -> top-left position supplied by the caller (e.g. dragged nodes).
pub type PositionOverrides = BTreeMap<String, Point>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSize {
    pub width: f32,
    pub height: f32,
}

impl NodeSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

const FALLBACK_NODE_SIZE: NodeSize = NodeSize::new(220.0, 80.0);

static DEFAULT_NODE_SIZES: Lazy<BTreeMap<String, NodeSize>> = Lazy::new(|| {
    [
        ("trigger", NodeSize::new(240.0, 72.0)),
        ("profileFilter", NodeSize::new(240.0, 88.0)),
        ("split", NodeSize::new(200.0, 88.0)),
        ("wait", NodeSize::new(200.0, 64.0)),
        ("message", NodeSize::new(260.0, 96.0)),
        ("outcome", NodeSize::new(200.0, 64.0)),
        ("note", NodeSize::new(220.0, 96.0)),
        ("strategy", NodeSize::new(220.0, 120.0)),
        ("merge", NodeSize::new(160.0, 48.0)),
    ]
    .into_iter()
    .map(|(kind, size)| (kind.to_string(), size))
    .collect()
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Vertical gap between a node and the nodes placed below it.
    pub row_spacing: f32,
    /// Horizontal distance between the centers of two adjacent lanes.
    pub lane_spacing: f32,
    /// Margin kept around the drawing after normalization.
    pub padding: f32,
    pub split_gap_multiplier: f32,
    pub collision_passes: usize,
    pub collision_padding: f32,
    pub overlap_tolerance: f32,
    pub annotation_gap: f32,
    pub annotation_left_offset: f32,
    pub edge_turn_offset: f32,
    pub strategy_extra_height: f32,
    pub default_node_size: NodeSize,
    pub node_sizes: BTreeMap<String, NodeSize>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_spacing: 48.0,
            lane_spacing: 320.0,
            padding: 40.0,
            split_gap_multiplier: 2.25,
            collision_passes: 12,
            collision_padding: 24.0,
            overlap_tolerance: 1.0,
            annotation_gap: 40.0,
            annotation_left_offset: -260.0,
            edge_turn_offset: 24.0,
            strategy_extra_height: 36.0,
            default_node_size: FALLBACK_NODE_SIZE,
            node_sizes: DEFAULT_NODE_SIZES.clone(),
        }
    }
}

impl LayoutConfig {
    /// Base size for a kind; unknown kinds fall back to `default_node_size`.
    pub fn node_size(&self, kind: &NodeKind) -> NodeSize {
        self.node_sizes
            .get(kind.as_str())
            .copied()
            .unwrap_or(self.default_node_size)
    }
}

/// Everything a single layout call needs besides the graph itself.
#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    pub layout: LayoutConfig,
    pub positions: PositionOverrides,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct OptionsFile {
    row_spacing: Option<f32>,
    lane_spacing: Option<f32>,
    padding: Option<f32>,
    split_gap_multiplier: Option<f32>,
    collision_passes: Option<usize>,
    collision_padding: Option<f32>,
    overlap_tolerance: Option<f32>,
    annotation_gap: Option<f32>,
    annotation_left_offset: Option<f32>,
    edge_turn_offset: Option<f32>,
    strategy_extra_height: Option<f32>,
    default_node_size: Option<NodeSize>,
    #[serde(default)]
    node_sizes: BTreeMap<String, NodeSize>,
    #[serde(default)]
    positions: PositionOverrides,
}

pub fn parse_options(contents: &str) -> Result<LayoutOptions, FlowError> {
    if contents.trim().is_empty() {
        return Ok(LayoutOptions::default());
    }
    let parsed: OptionsFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(_) => json5::from_str(contents).map_err(|err| FlowError::Options(err.to_string()))?,
    };

    let mut options = LayoutOptions::default();
    let config = &mut options.layout;
    if let Some(v) = parsed.row_spacing {
        config.row_spacing = v;
    }
    if let Some(v) = parsed.lane_spacing {
        config.lane_spacing = v;
    }
    if let Some(v) = parsed.padding {
        config.padding = v;
    }
    if let Some(v) = parsed.split_gap_multiplier {
        config.split_gap_multiplier = v;
    }
    if let Some(v) = parsed.collision_passes {
        config.collision_passes = v;
    }
    if let Some(v) = parsed.collision_padding {
        config.collision_padding = v;
    }
    if let Some(v) = parsed.overlap_tolerance {
        config.overlap_tolerance = v;
    }
    if let Some(v) = parsed.annotation_gap {
        config.annotation_gap = v;
    }
    if let Some(v) = parsed.annotation_left_offset {
        config.annotation_left_offset = v;
    }
    if let Some(v) = parsed.edge_turn_offset {
        config.edge_turn_offset = v;
    }
    if let Some(v) = parsed.strategy_extra_height {
        config.strategy_extra_height = v;
    }
    if let Some(v) = parsed.default_node_size {
        config.default_node_size = v;
    }
    // Per-kind overrides replace individual entries, the rest keep defaults.
    config.node_sizes.extend(parsed.node_sizes);
    options.positions = parsed.positions;
    Ok(options)
}

pub fn load_options(path: Option<&Path>) -> Result<LayoutOptions, FlowError> {
    let Some(path) = path else {
        return Ok(LayoutOptions::default());
    };
    let contents = std::fs::read_to_string(path).map_err(|source| FlowError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_options(&contents)
}
