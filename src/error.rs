use thiserror::Error;

/// Errors at the document boundary. Layout itself never fails.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid flow document: {0}")]
    Flow(String),
    #[error("invalid layout options: {0}")]
    Options(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FlowError {
    fn from(e: serde_json::Error) -> Self {
        FlowError::Serialization(e.to_string())
    }
}
