use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::DocError;

pub const DEFAULT_TOKEN_ENV: &str = "TRACEFISH_TOKEN";

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub api_base_url: String,
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default)]
    pub storage: StorageOverrides,
}

/// Optional replacements for the platform-resolved storage roots. Mostly
/// useful on headless deployments where the app-private directories live on
/// a mounted volume.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageOverrides {
    #[serde(default)]
    pub documents_dir: Option<String>,
    #[serde(default)]
    pub cache_dir: Option<String>,
    #[serde(default)]
    pub downloads_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_base_url: String,
    pub token_env: String,
    pub documents_dir: Option<Utf8PathBuf>,
    pub cache_dir: Option<Utf8PathBuf>,
    pub downloads_dir: Option<Utf8PathBuf>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, DocError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from("tracefish-doc.json"),
        };

        if path.is_none() && !config_path.exists() {
            return Err(DocError::MissingConfig);
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| DocError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| DocError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, DocError> {
        let api_base_url = config.api_base_url.trim().trim_end_matches('/').to_string();
        if api_base_url.is_empty() || !api_base_url.starts_with("http") {
            return Err(DocError::InvalidBaseUrl(config.api_base_url));
        }

        let token_env = config
            .token_env
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string());

        Ok(ResolvedConfig {
            api_base_url,
            token_env,
            documents_dir: config.storage.documents_dir.map(Utf8PathBuf::from),
            cache_dir: config.storage.cache_dir.map(Utf8PathBuf::from),
            downloads_dir: config.storage.downloads_dir.map(Utf8PathBuf::from),
        })
    }
}
