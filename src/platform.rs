use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::DocError;

/// Outcome of a share handoff. Dismissal by the user is a normal outcome,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Dismissed,
}

#[derive(Debug, Clone)]
pub struct SharePayload {
    pub title: String,
    pub message: String,
    pub file: Utf8PathBuf,
    pub media_type: String,
}

/// OS bindings the pipeline depends on. The sequencing and error
/// classification live above this trait; everything below it is host glue.
pub trait Platform: Send + Sync {
    /// Asks the OS for a shared-storage write grant, showing `rationale`
    /// when a prompt is involved. Hosts whose storage model gives the app
    /// scoped write access unconditionally answer `true` without prompting.
    fn request_write_permission(&self, rationale: &str) -> Result<bool, DocError>;

    fn ensure_directory(&self, dir: &Utf8Path) -> Result<(), DocError>;

    fn write_file(&self, path: &Utf8Path, bytes: &[u8]) -> Result<(), DocError>;

    fn open_file(&self, path: &Utf8Path) -> Result<(), DocError>;

    fn share_file(&self, payload: &SharePayload) -> Result<ShareOutcome, DocError>;
}

/// Desktop implementation. Write permission is unconditional, the viewer is
/// the system default handler, and "share" reveals the file in the file
/// manager so the user can pass it on.
pub struct NativePlatform;

impl Platform for NativePlatform {
    fn request_write_permission(&self, _rationale: &str) -> Result<bool, DocError> {
        Ok(true)
    }

    fn ensure_directory(&self, dir: &Utf8Path) -> Result<(), DocError> {
        fs::create_dir_all(dir.as_std_path())
            .map_err(|err| DocError::Filesystem(format!("create {dir}: {err}")))
    }

    // Temp file in the target directory plus an atomic persist, so a failed
    // attempt never leaves a partial artifact behind.
    fn write_file(&self, path: &Utf8Path, bytes: &[u8]) -> Result<(), DocError> {
        let parent = path
            .parent()
            .ok_or_else(|| DocError::Filesystem(format!("no parent directory for {path}")))?;
        let mut temp = tempfile::Builder::new()
            .prefix("tracefish-doc")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| DocError::Filesystem(format!("stage in {parent}: {err}")))?;
        temp.write_all(bytes)
            .map_err(|err| DocError::Filesystem(format!("write {path}: {err}")))?;
        temp.persist(path.as_std_path())
            .map_err(|err| DocError::Filesystem(format!("persist {path}: {err}")))?;
        Ok(())
    }

    fn open_file(&self, path: &Utf8Path) -> Result<(), DocError> {
        opener::open(path.as_std_path())
            .map_err(|_| DocError::NoViewerAvailable(path.to_string()))
    }

    fn share_file(&self, payload: &SharePayload) -> Result<ShareOutcome, DocError> {
        tracing::debug!(title = %payload.title, file = %payload.file, "revealing artifact");
        opener::reveal(payload.file.as_std_path())
            .map_err(|err| DocError::ShareFailed(err.to_string()))?;
        Ok(ShareOutcome::Shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_file_is_atomic_under_failure() {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let target = root.join("missing-dir").join("doc.pdf");

        let err = NativePlatform.write_file(&target, b"%PDF").unwrap_err();
        assert!(matches!(err, DocError::Filesystem(_)));
        assert!(!target.as_std_path().exists());
    }

    #[test]
    fn write_file_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let target = root.join("doc.pdf");

        NativePlatform.ensure_directory(&root).unwrap();
        NativePlatform.write_file(&target, b"%PDF-1.7").unwrap();
        assert_eq!(fs::read(target.as_std_path()).unwrap(), b"%PDF-1.7");
    }
}
