use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Trigger,
    ProfileFilter,
    Split,
    Wait,
    Message,
    Outcome,
    Note,
    Strategy,
    Merge,
    Other(String),
}

impl NodeKind {
    pub fn from_token(token: &str) -> Self {
        match token {
            "trigger" => Self::Trigger,
            "profileFilter" => Self::ProfileFilter,
            "split" => Self::Split,
            "wait" => Self::Wait,
            "message" => Self::Message,
            "outcome" => Self::Outcome,
            "note" => Self::Note,
            "strategy" => Self::Strategy,
            "merge" => Self::Merge,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Trigger => "trigger",
            Self::ProfileFilter => "profileFilter",
            Self::Split => "split",
            Self::Wait => "wait",
            Self::Message => "message",
            Self::Outcome => "outcome",
            Self::Note => "note",
            Self::Strategy => "strategy",
            Self::Merge => "merge",
            Self::Other(tag) => tag,
        }
    }

    /// Annotation kinds sit beside the flow instead of inside it.
    pub fn is_side(&self) -> bool {
        matches!(self, Self::Note | Self::Strategy)
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        Self::from_token(&value)
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Branch labels of a split, in authoring order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            title: None,
            branches: Vec::new(),
            duration: None,
            channel: None,
            strategy: None,
            text: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    pub fn has_strategy(&self) -> bool {
        self.strategy
            .as_deref()
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            label: None,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, id: &str, kind: NodeKind) -> &mut Self {
        self.nodes.push(Node::new(id, kind));
        self
    }

    pub fn edge(&mut self, id: &str, from: &str, to: &str) -> &mut Self {
        self.edges.push(Edge::new(id, from, to));
        self
    }

    pub fn labeled_edge(&mut self, id: &str, from: &str, to: &str, label: &str) -> &mut Self {
        self.edges.push(Edge::new(id, from, to).labeled(label));
        self
    }
}
