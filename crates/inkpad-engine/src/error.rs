#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Failed to encode rich snapshot: {0}")]
    SnapshotEncode(#[source] serde_json::Error),
    #[error("Failed to decode rich snapshot: {0}")]
    SnapshotDecode(#[source] serde_json::Error),
    #[error("Malformed rich snapshot: {0}")]
    MalformedSnapshot(String),
    #[error("Heading level {0} is out of range (expected 1-3)")]
    InvalidHeadingLevel(u8),
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
