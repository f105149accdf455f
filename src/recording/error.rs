//! Recording ingestion errors.

/// Reasons a recording is rejected before an engine is built from it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestionError {
    #[error("Recording has no pages")]
    MissingPages,

    #[error("Recording has no action list")]
    MissingActions,

    #[error("Recording has no audio track")]
    MissingAudio,

    #[error("Page {index} appears more than once")]
    DuplicatePage { index: usize },

    #[error("Action at {timestamp_ms}ms references unknown page {page}")]
    UnknownPage { page: usize, timestamp_ms: u64 },

    #[error("Unsupported recording version {0} (expected {expected})", expected = super::FORMAT_VERSION)]
    UnsupportedVersion(u32),
}
