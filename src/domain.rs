use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DocError;

/// Positive integer identifier of a traceability record on the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = DocError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let parsed = trimmed
            .parse::<u64>()
            .map_err(|_| DocError::InvalidRecordId(value.to_string()))?;
        if parsed == 0 {
            return Err(DocError::InvalidRecordId(value.to_string()));
        }
        Ok(Self(parsed))
    }
}

/// Human-readable document number printed on the compliance certificate.
/// Restricted to characters that are safe inside an artifact file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentNumber(String);

impl DocumentNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentNumber {
    type Err = DocError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        let re = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap();
        if !re.is_match(&normalized) {
            return Err(DocError::InvalidDocumentNumber(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

/// One pipeline run is keyed by this pair; every run constructs fresh state
/// from it and nothing is shared across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub record_id: RecordId,
    pub document_no: DocumentNumber,
}

impl DocumentRequest {
    pub fn new(record_id: RecordId, document_no: DocumentNumber) -> Self {
        Self {
            record_id,
            document_no,
        }
    }

    /// Artifact file name, qualified by the wall-clock timestamp so repeated
    /// runs for the same record never collide or overwrite.
    pub fn artifact_file_name(&self, now: DateTime<Utc>) -> String {
        let stamp = now
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        format!("traceability-{}-{stamp}.pdf", self.document_no)
    }
}

/// Storage locations eligible to receive the persisted artifact, in trial
/// order. App-private directories never need a runtime permission grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectoryKind {
    AppDocuments,
    AppCache,
    Downloads,
}

impl DirectoryKind {
    /// Label shown to the user in the success notice.
    pub fn label(&self) -> &'static str {
        match self {
            DirectoryKind::AppDocuments => "App Documents folder",
            DirectoryKind::AppCache => "App Cache folder",
            DirectoryKind::Downloads => "Downloads folder",
        }
    }
}

impl fmt::Display for DirectoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parse_record_id_valid() {
        let id: RecordId = " 42 ".parse().unwrap();
        assert_eq!(id.as_u64(), 42);
    }

    #[test]
    fn parse_record_id_invalid() {
        let err = "0".parse::<RecordId>().unwrap_err();
        assert_matches!(err, DocError::InvalidRecordId(_));
        let err = "abc".parse::<RecordId>().unwrap_err();
        assert_matches!(err, DocError::InvalidRecordId(_));
    }

    #[test]
    fn parse_document_number_valid() {
        let no: DocumentNumber = "TR-2025-0042".parse().unwrap();
        assert_eq!(no.as_str(), "TR-2025-0042");
    }

    #[test]
    fn parse_document_number_invalid() {
        let err = "TR 2025/0042".parse::<DocumentNumber>().unwrap_err();
        assert_matches!(err, DocError::InvalidDocumentNumber(_));
        let err = "".parse::<DocumentNumber>().unwrap_err();
        assert_matches!(err, DocError::InvalidDocumentNumber(_));
    }

    #[test]
    fn artifact_file_name_has_sanitized_timestamp() {
        let request = DocumentRequest::new(
            "7".parse().unwrap(),
            "TR-2025-0042".parse().unwrap(),
        );
        let now = Utc.with_ymd_and_hms(2025, 8, 6, 12, 30, 45).unwrap();
        let name = request.artifact_file_name(now);
        assert_eq!(name, "traceability-TR-2025-0042-2025-08-06T12-30-45-000Z.pdf");
        assert!(!name.contains(':'));
    }

    #[test]
    fn artifact_file_names_distinct_across_runs() {
        let request = DocumentRequest::new(
            "7".parse().unwrap(),
            "TR-2025-0042".parse().unwrap(),
        );
        let first = request.artifact_file_name(
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        );
        let second = request.artifact_file_name(
            Utc.timestamp_millis_opt(1_700_000_000_001).unwrap(),
        );
        assert_ne!(first, second);
    }

    #[test]
    fn directory_kind_labels() {
        assert_eq!(DirectoryKind::AppDocuments.label(), "App Documents folder");
        assert_eq!(DirectoryKind::AppCache.label(), "App Cache folder");
        assert_eq!(DirectoryKind::Downloads.label(), "Downloads folder");
    }
}
