use serde::{Deserialize, Serialize};

use crate::ir::NodeKind;

use super::error::LayoutIssue;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub kind: NodeKind,
    pub title: Option<String>,
    pub width: f32,
    pub height: f32,
    /// Top-left corner.
    pub x: f32,
    pub y: f32,
    pub lane: f32,
}

impl PositionedNode {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    /// Empty when either endpoint does not resolve to a laid-out node.
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<RoutedEdge>,
    pub width: f32,
    pub height: f32,
    pub issues: Vec<LayoutIssue>,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&RoutedEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }
}
