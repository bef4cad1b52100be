use chrono::Utc;
use serde::Serialize;

use crate::domain::{DocumentRequest, PDF_MEDIA_TYPE};
use crate::download::{ArtifactDownloader, DownloadedArtifact};
use crate::error::DocError;
use crate::generation::GenerationClient;
use crate::platform::{Platform, SharePayload, ShareOutcome};
use crate::storage::{PersistedFile, Store, WriteAttempt};

const PERMISSION_RATIONALE: &str =
    "Storage access is needed to save PDF files to the Downloads folder.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// One user-facing progress or outcome message. Levels mirror the notice
/// styles of the host surface (info/success/error).
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Injected notification capability, so the pipeline core runs (and is
/// tested) without any UI runtime behind it.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Serializable summary of a completed run, for non-interactive output.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub record_id: u64,
    pub document_no: String,
    pub path: String,
    pub location: String,
    pub size_bytes: u64,
}

impl RunReport {
    pub fn new(request: &DocumentRequest, file: &PersistedFile) -> Self {
        Self {
            record_id: request.record_id.as_u64(),
            document_no: request.document_no.to_string(),
            path: file.path.to_string(),
            location: file.directory_kind.label().to_string(),
            size_bytes: file.byte_len,
        }
    }
}

/// The document acquisition pipeline: permission gate, generation request,
/// download/validation, then first-success persistence across the store's
/// candidates. One run per invocation; runs share no state.
pub struct DocumentPipeline<G, D, P> {
    generation: G,
    downloader: D,
    platform: P,
    store: Store,
}

impl<G: GenerationClient, D: ArtifactDownloader, P: Platform> DocumentPipeline<G, D, P> {
    pub fn new(generation: G, downloader: D, platform: P, store: Store) -> Self {
        Self {
            generation,
            downloader,
            platform,
            store,
        }
    }

    pub fn run(
        &self,
        request: &DocumentRequest,
        sink: &dyn Notifier,
    ) -> Result<PersistedFile, DocError> {
        sink.notify(Notice::info(
            "Generating Document",
            format!("Creating PDF for {}...", request.document_no),
        ));

        let write_granted = self.gate_permission()?;

        sink.notify(Notice::info("Step 1/3", "Requesting document generation..."));
        let locator = self.generation.generate(request.record_id)?;
        tracing::debug!(record = %request.record_id, "download locator received");

        sink.notify(Notice::info("Step 2/3", "Downloading PDF file..."));
        let artifact = self.downloader.fetch(&locator)?;
        tracing::debug!(bytes = artifact.byte_len(), "artifact downloaded");

        sink.notify(Notice::info("Step 3/3", "Saving to device..."));
        let file_name = request.artifact_file_name(Utc::now());
        let persisted = self.persist(&artifact, &file_name, write_granted)?;

        sink.notify(Notice::success(
            "Download Complete",
            format!(
                "PDF saved to {} ({:.1} KB)",
                persisted.directory_kind.label(),
                persisted.byte_len as f64 / 1024.0
            ),
        ));
        Ok(persisted)
    }

    /// Prompts only when some candidate actually needs a grant. A refusal is
    /// not fatal here; it narrows the candidate list during persistence.
    fn gate_permission(&self) -> Result<bool, DocError> {
        let needs_grant = self
            .store
            .candidates()
            .iter()
            .any(|candidate| candidate.requires_permission);
        if !needs_grant {
            return Ok(true);
        }
        let granted = self.platform.request_write_permission(PERMISSION_RATIONALE)?;
        if !granted {
            tracing::debug!("write permission refused, shared candidates disqualified");
        }
        Ok(granted)
    }

    fn persist(
        &self,
        artifact: &DownloadedArtifact,
        file_name: &str,
        write_granted: bool,
    ) -> Result<PersistedFile, DocError> {
        let eligible = self.store.eligible(write_granted);
        if eligible.is_empty() {
            return Err(DocError::PermissionDenied);
        }

        let mut attempts: Vec<WriteAttempt> = Vec::new();
        for candidate in eligible {
            let path = Store::artifact_path(candidate, file_name);
            let outcome = self
                .platform
                .ensure_directory(&candidate.base_directory)
                .and_then(|()| self.platform.write_file(&path, artifact.bytes()));
            match outcome {
                Ok(()) => {
                    tracing::debug!(path = %path, "artifact persisted");
                    return Ok(PersistedFile {
                        path,
                        directory_kind: candidate.kind,
                        byte_len: artifact.byte_len(),
                    });
                }
                Err(err) => {
                    tracing::warn!(kind = %candidate.kind, error = %err, "storage candidate rejected write");
                    attempts.push(WriteAttempt {
                        kind: candidate.kind,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Err(DocError::AllStorageTargetsFailed {
            attempts: attempts.iter().map(WriteAttempt::describe).collect(),
        })
    }

    /// Handoff: open the persisted file in the platform viewer.
    pub fn open(&self, file: &PersistedFile) -> Result<(), DocError> {
        self.platform.open_file(&file.path)
    }

    /// Handoff: pass the persisted file to the platform share integration.
    pub fn share(
        &self,
        request: &DocumentRequest,
        file: &PersistedFile,
    ) -> Result<ShareOutcome, DocError> {
        let payload = SharePayload {
            title: format!("Traceability Record - {}", request.document_no),
            message: format!("Traceability Record PDF: {}", request.document_no),
            file: file.path.clone(),
            media_type: PDF_MEDIA_TYPE.to_string(),
        };
        self.platform.share_file(&payload)
    }
}
