//! The external fetch/extract collaborator seam.

use anyhow::Result;
use async_trait::async_trait;

/// Content returned by a fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    /// Raw extracted content; the fingerprint is computed over this.
    pub content: String,
    /// Opaque extraction result, persisted verbatim alongside the
    /// fingerprint.
    pub summary: String,
}

impl FetchedContent {
    /// Content with no separate extraction step: the body doubles as the
    /// summary.
    pub fn plain(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            summary: content.clone(),
            content,
        }
    }
}

/// Fetches and extracts content for an address.
///
/// Implementations own all network and browser mechanics, including their
/// own timeouts. Errors are reported to the caller and never retried
/// internally, so the watch loop stays in charge of retry cadence.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, address: &str, extraction_spec: &str) -> Result<FetchedContent>;
}
