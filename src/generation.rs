use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::domain::RecordId;
use crate::error::DocError;

/// Wire shape of the generation endpoint. The payload is only considered
/// valid when `success` is true and a locator is present.
#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl GenerationResponse {
    pub fn into_locator(self) -> Result<String, DocError> {
        match self.download_url {
            Some(url) if self.success && !url.trim().is_empty() => Ok(url),
            _ => Err(DocError::InvalidGenerationResponse),
        }
    }
}

pub trait GenerationClient: Send + Sync {
    /// Asks the remote service to materialize the document for `id` and
    /// returns the time-limited download locator.
    fn generate(&self, id: RecordId) -> Result<String, DocError>;
}

pub struct GenerationHttpClient {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl GenerationHttpClient {
    pub fn new(base_url: &str, bearer_token: &str) -> Result<Self, DocError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("tracefish-doc/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| DocError::GenerationHttp(err.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| DocError::GenerationHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
        })
    }

    fn generation_url(&self, id: RecordId) -> String {
        format!("{}/traceability-records/{id}/generate-document", self.base_url)
    }
}

impl GenerationClient for GenerationHttpClient {
    // Deliberately single-shot: a retry of document generation is a fresh
    // user-initiated run, never an automatic resend.
    fn generate(&self, id: RecordId) -> Result<String, DocError> {
        let url = self.generation_url(id);
        let response = self
            .client
            .get(&url)
            .header(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", self.bearer_token))
                    .map_err(|err| DocError::GenerationHttp(err.to_string()))?,
            )
            .send()
            .map_err(|err| DocError::GenerationHttp(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "generation request failed".to_string());
            return Err(DocError::ServerError { status, message });
        }

        let payload: GenerationResponse = response
            .json()
            .map_err(|_| DocError::InvalidGenerationResponse)?;
        payload.into_locator()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn locator_requires_success_flag() {
        let response = GenerationResponse {
            success: false,
            download_url: Some("https://cdn.example/doc.pdf".to_string()),
        };
        let err = response.into_locator().unwrap_err();
        assert_matches!(err, DocError::InvalidGenerationResponse);
    }

    #[test]
    fn locator_requires_url() {
        let response = GenerationResponse {
            success: true,
            download_url: None,
        };
        let err = response.into_locator().unwrap_err();
        assert_matches!(err, DocError::InvalidGenerationResponse);

        let response = GenerationResponse {
            success: true,
            download_url: Some("   ".to_string()),
        };
        assert_matches!(
            response.into_locator().unwrap_err(),
            DocError::InvalidGenerationResponse
        );
    }

    #[test]
    fn locator_passes_through() {
        let response = GenerationResponse {
            success: true,
            download_url: Some("https://cdn.example/doc.pdf".to_string()),
        };
        assert_eq!(
            response.into_locator().unwrap(),
            "https://cdn.example/doc.pdf"
        );
    }

    #[test]
    fn generation_url_shape() {
        let client =
            GenerationHttpClient::new("https://api.tracefish.example/v1/", "token").unwrap();
        let id: RecordId = "15".parse().unwrap();
        assert_eq!(
            client.generation_url(id),
            "https://api.tracefish.example/v1/traceability-records/15/generate-document"
        );
    }
}
