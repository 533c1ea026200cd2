//! Image proxy capability.
//!
//! Rewrites an image reference for delivery. Pure and synchronous: builds a
//! URL, never fetches one.

use url::Url;

pub trait ImageProxy {
    fn proxy(&self, src: &str) -> String;
}

/// Leaves references untouched. Default when no endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughProxy;

impl ImageProxy for PassthroughProxy {
    fn proxy(&self, src: &str) -> String {
        src.to_string()
    }
}

/// Routes absolute http(s) images through `{endpoint}?url=<src>`.
/// Bundled and relative references are served by the host as-is.
#[derive(Debug, Clone)]
pub struct CdnProxy {
    endpoint: Url,
}

impl CdnProxy {
    pub fn new(endpoint: &str) -> Result<Self, url::ParseError> {
        Ok(Self { endpoint: Url::parse(endpoint)? })
    }
}

impl ImageProxy for CdnProxy {
    fn proxy(&self, src: &str) -> String {
        match Url::parse(src) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {
                let mut rewritten = self.endpoint.clone();
                rewritten.query_pairs_mut().append_pair("url", src);
                rewritten.to_string()
            }
            _ => src.to_string(),
        }
    }
}
