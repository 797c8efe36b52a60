use thiserror::Error;

/// A theme switch named a theme outside the fixed catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme: {0}")]
pub struct InvalidThemeError(pub String);

/// The streaming download got a non-success HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("download failed, HTTP status {0}")]
pub struct DownloadStatusError(pub u16);
