use camino::Utf8PathBuf;
use directories::{ProjectDirs, UserDirs};

use crate::config::ResolvedConfig;
use crate::domain::DirectoryKind;
use crate::error::DocError;

/// One directory eligible to receive the artifact. Candidates are tried in
/// the order they appear in the store; shared locations carry the
/// permission flag and are disqualified when the grant is refused.
#[derive(Debug, Clone)]
pub struct StorageCandidate {
    pub kind: DirectoryKind,
    pub base_directory: Utf8PathBuf,
    pub requires_permission: bool,
}

/// Produced once a write succeeds. The pipeline never deletes it; the file
/// belongs to the device filesystem from here on.
#[derive(Debug, Clone)]
pub struct PersistedFile {
    pub path: Utf8PathBuf,
    pub directory_kind: DirectoryKind,
    pub byte_len: u64,
}

/// Failed trial of one candidate, kept for the terminal error report.
#[derive(Debug, Clone)]
pub struct WriteAttempt {
    pub kind: DirectoryKind,
    pub reason: String,
}

impl WriteAttempt {
    pub fn describe(&self) -> String {
        format!("{}: {}", self.kind.label(), self.reason)
    }
}

/// Ordered storage candidates for one host. App-private roots rank first
/// since they never need a runtime grant; the shared downloads folder is the
/// most useful to the user but the least reliable, so it goes last.
#[derive(Debug, Clone)]
pub struct Store {
    candidates: Vec<StorageCandidate>,
}

impl Store {
    pub fn resolve(config: &ResolvedConfig) -> Result<Self, DocError> {
        let project = ProjectDirs::from("org", "MFD", "tracefish-doc");

        let documents_dir = config
            .documents_dir
            .clone()
            .or_else(|| {
                project.as_ref().and_then(|dirs| {
                    Utf8PathBuf::from_path_buf(dirs.data_dir().to_path_buf()).ok()
                })
            })
            .ok_or_else(|| {
                DocError::Filesystem("unable to resolve app documents directory".to_string())
            })?;

        let cache_dir = config
            .cache_dir
            .clone()
            .or_else(|| {
                project.as_ref().and_then(|dirs| {
                    Utf8PathBuf::from_path_buf(dirs.cache_dir().to_path_buf()).ok()
                })
            })
            .ok_or_else(|| {
                DocError::Filesystem("unable to resolve app cache directory".to_string())
            })?;

        let downloads_dir = config.downloads_dir.clone().or_else(|| {
            UserDirs::new()
                .and_then(|dirs| dirs.download_dir().map(|dir| dir.to_path_buf()))
                .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        });

        let mut candidates = vec![
            StorageCandidate {
                kind: DirectoryKind::AppDocuments,
                base_directory: documents_dir,
                requires_permission: false,
            },
            StorageCandidate {
                kind: DirectoryKind::AppCache,
                base_directory: cache_dir,
                requires_permission: false,
            },
        ];
        // A host without a downloads folder just has a shorter list.
        if let Some(downloads_dir) = downloads_dir {
            candidates.push(StorageCandidate {
                kind: DirectoryKind::Downloads,
                base_directory: downloads_dir,
                requires_permission: true,
            });
        }

        Ok(Self { candidates })
    }

    pub fn new_with_candidates(candidates: Vec<StorageCandidate>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[StorageCandidate] {
        &self.candidates
    }

    /// Candidates still in play after the permission gate ran.
    pub fn eligible(&self, write_permission_granted: bool) -> Vec<&StorageCandidate> {
        self.candidates
            .iter()
            .filter(|candidate| write_permission_granted || !candidate.requires_permission)
            .collect()
    }

    pub fn artifact_path(candidate: &StorageCandidate, file_name: &str) -> Utf8PathBuf {
        candidate.base_directory.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> Store {
        Store::new_with_candidates(vec![
            StorageCandidate {
                kind: DirectoryKind::AppDocuments,
                base_directory: Utf8PathBuf::from("/data/documents"),
                requires_permission: false,
            },
            StorageCandidate {
                kind: DirectoryKind::AppCache,
                base_directory: Utf8PathBuf::from("/data/cache"),
                requires_permission: false,
            },
            StorageCandidate {
                kind: DirectoryKind::Downloads,
                base_directory: Utf8PathBuf::from("/shared/downloads"),
                requires_permission: true,
            },
        ])
    }

    #[test]
    fn candidate_order_prefers_app_private_roots() {
        let store = sample_store();
        let kinds: Vec<_> = store.candidates().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DirectoryKind::AppDocuments,
                DirectoryKind::AppCache,
                DirectoryKind::Downloads
            ]
        );
    }

    #[test]
    fn denied_permission_disqualifies_shared_candidates_only() {
        let store = sample_store();
        let eligible = store.eligible(false);
        assert_eq!(eligible.len(), 2);
        assert!(eligible.iter().all(|c| !c.requires_permission));

        let eligible = store.eligible(true);
        assert_eq!(eligible.len(), 3);
    }

    #[test]
    fn artifact_path_joins_file_name() {
        let store = sample_store();
        let path = Store::artifact_path(&store.candidates()[0], "doc.pdf");
        assert_eq!(path, Utf8PathBuf::from("/data/documents/doc.pdf"));
    }
}
