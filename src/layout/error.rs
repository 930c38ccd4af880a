use thiserror::Error;

/// A fallback taken while laying out a malformed or unusual graph.
///
/// Issues never abort a layout; they are returned next to the result so
/// callers can surface them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutIssue {
    #[error("duplicate node id `{id}`; later definition ignored")]
    DuplicateNode { id: String },
    #[error("edge `{edge}` references unknown node `{missing}`")]
    DanglingEdge { edge: String, missing: String },
    #[error("annotation `{id}` has {outgoing} outgoing edges; stacked below the flow")]
    DetachedAnnotation { id: String, outgoing: usize },
    #[error("nodes {ids:?} could not be ordered (cycle or unreachable); appended in input order")]
    Unscheduled { ids: Vec<String> },
    #[error("{overlaps} node overlaps remain after {passes} collision passes")]
    UnresolvedCollisions { passes: usize, overlaps: usize },
}

#[derive(Debug, Default)]
pub(super) struct Diagnostics {
    issues: Vec<LayoutIssue>,
}

impl Diagnostics {
    pub(super) fn push(&mut self, issue: LayoutIssue) {
        tracing::warn!("{issue}");
        self.issues.push(issue);
    }

    pub(super) fn into_issues(self) -> Vec<LayoutIssue> {
        self.issues
    }
}
