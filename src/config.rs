//! Render configuration, loaded from a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::proxy::{CdnProxy, ImageProxy, PassthroughProxy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid proxy endpoint {0}: {1}")]
    ProxyEndpoint(String, url::ParseError),
}

/// What to do with a `locale` outside the translation dictionary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LocalePolicy {
    /// Unknown locale fails validation; nothing is rendered.
    #[default]
    Reject,
    /// Unknown locale is recorded as a warning and rendered in English.
    Fallback,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    /// Rewrite endpoint; absent means image references pass through untouched.
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    #[serde(default)]
    pub unknown_locale: LocalePolicy,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

impl RenderConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!("Loading render config from: {:?}", path);
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn image_proxy(&self) -> Result<Box<dyn ImageProxy + Send + Sync>, ConfigError> {
        match &self.proxy.endpoint {
            Some(endpoint) => {
                let proxy = CdnProxy::new(endpoint)
                    .map_err(|e| ConfigError::ProxyEndpoint(endpoint.clone(), e))?;
                Ok(Box::new(proxy))
            }
            None => Ok(Box::new(PassthroughProxy)),
        }
    }
}
