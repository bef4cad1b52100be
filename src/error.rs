use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DocError {
    #[error("invalid record id: {0}")]
    InvalidRecordId(String),

    #[error("invalid document number: {0}")]
    InvalidDocumentNumber(String),

    #[error("missing config file tracefish-doc.json in current directory")]
    MissingConfig,

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid service base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("bearer credential unavailable: environment variable {0} is not set")]
    MissingCredential(String),

    #[error("storage permission denied and no permission-free location remains")]
    PermissionDenied,

    #[error("generation request failed: {0}")]
    GenerationHttp(String),

    #[error("generation endpoint returned status {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("document generation failed or no download locator was provided")]
    InvalidGenerationResponse,

    #[error("artifact request failed: {0}")]
    DownloadHttp(String),

    #[error("artifact download failed with status {status}")]
    DownloadFailed { status: u16 },

    #[error("downloaded document is empty")]
    EmptyArtifact,

    #[error("failed to save document to any storage location: {}", attempts.join("; "))]
    AllStorageTargetsFailed { attempts: Vec<String> },

    #[error("no application available to open {0}")]
    NoViewerAvailable(String),

    #[error("failed to share document: {0}")]
    ShareFailed(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
