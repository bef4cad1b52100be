use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

use crate::domain::PDF_MEDIA_TYPE;
use crate::error::DocError;

/// Validated binary payload. Construction guarantees a non-empty body; the
/// declared media type is recorded as-is and never trusted for validation.
#[derive(Debug, Clone)]
pub struct DownloadedArtifact {
    bytes: Vec<u8>,
    media_type: Option<String>,
}

impl DownloadedArtifact {
    pub fn new(bytes: Vec<u8>, media_type: Option<String>) -> Result<Self, DocError> {
        if bytes.is_empty() {
            return Err(DocError::EmptyArtifact);
        }
        Ok(Self { bytes, media_type })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }
}

pub trait ArtifactDownloader: Send + Sync {
    /// Fetches the binary behind a download locator returned by the
    /// generation endpoint.
    fn fetch(&self, locator: &str) -> Result<DownloadedArtifact, DocError>;
}

pub struct HttpArtifactDownloader {
    client: Client,
}

impl HttpArtifactDownloader {
    pub fn new() -> Result<Self, DocError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("tracefish-doc/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| DocError::DownloadHttp(err.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(PDF_MEDIA_TYPE));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| DocError::DownloadHttp(err.to_string()))?;
        Ok(Self { client })
    }
}

impl ArtifactDownloader for HttpArtifactDownloader {
    fn fetch(&self, locator: &str) -> Result<DownloadedArtifact, DocError> {
        let response = self
            .client
            .get(locator)
            .send()
            .map_err(|err| DocError::DownloadHttp(err.to_string()))?;

        if !response.status().is_success() {
            return Err(DocError::DownloadFailed {
                status: response.status().as_u16(),
            });
        }

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        // Content-type headers from the generation backend are unreliable,
        // so a mismatch is only worth a warning. An empty body is fatal no
        // matter what the status line said.
        if !media_type
            .as_deref()
            .map(|value| value.contains("pdf"))
            .unwrap_or(false)
        {
            tracing::warn!(content_type = ?media_type, "unexpected artifact content type");
        }

        let bytes = response
            .bytes()
            .map_err(|err| DocError::DownloadHttp(err.to_string()))?;
        DownloadedArtifact::new(bytes.to_vec(), media_type)
    }
}
