//! Retrieval of the API text documentation.
use crate::error::{PipelineError, PipelineResult};

/// Source of raw documentation bytes.
pub trait DocumentFetcher {
    fn fetch(&self, url: &str) -> PipelineResult<Vec<u8>>;
}

/// Single blocking GET with no retry; any transport error or non-2xx status
/// fails the run.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl DocumentFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> PipelineResult<Vec<u8>> {
        let fetch_error = |reason: String| PipelineError::Fetch {
            url: url.to_string(),
            reason,
        };
        let mut response = ureq::get(url)
            .call()
            .map_err(|err| fetch_error(err.to_string()))?;
        let bytes = response
            .body_mut()
            .with_config()
            .limit(64 * 1024 * 1024)
            .read_to_vec()
            .map_err(|err| fetch_error(err.to_string()))?;
        tracing::debug!(url, bytes = bytes.len(), "documentation fetched");
        Ok(bytes)
    }
}
