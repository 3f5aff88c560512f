use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) const EMPTY_COLLABORATION: &str = "A collaboration needs at least one process graph";

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    EmptyCollaboration(String),

    #[error("Unexpected node type: {0}")]
    UnsupportedNodeType(String),

    #[error("Missing geometry for {0}")]
    MissingGeometry(String),

    #[error("Unknown node {0}")]
    UnknownNode(String),

    #[error("Duplicate id {0}")]
    DuplicateId(String),

    #[error("No message nodes bound to {0}")]
    UnknownMessageFlow(String),

    #[error("Message flow {key} has {senders} sender node(s) but {receivers} receiver node(s)")]
    MessageFlowMismatch {
        key: String,
        senders: usize,
        receivers: usize,
    },

    #[error("All message nodes of {0} have already been consumed")]
    ExhaustedMessageFlow(String),

    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
