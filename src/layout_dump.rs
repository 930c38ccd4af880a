use crate::error::FlowError;
use crate::layout::{Layout, Point};
use serde::Serialize;

/// Wire shape handed to the canvas: camelCase, one entry per input id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
    pub lane: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub waypoints: Vec<Point>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                kind: node.kind.as_str().to_string(),
                title: node.title.clone(),
                width: node.width,
                height: node.height,
                x: node.x,
                y: node.y,
                lane: node.lane,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
                label: edge.label.clone(),
                waypoints: edge.points.clone(),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
            issues: layout.issues.iter().map(ToString::to_string).collect(),
        }
    }
}

pub fn layout_to_json(layout: &Layout, pretty: bool) -> Result<String, FlowError> {
    let dump = LayoutDump::from_layout(layout);
    let json = if pretty {
        serde_json::to_string_pretty(&dump)?
    } else {
        serde_json::to_string(&dump)?
    };
    Ok(json)
}
