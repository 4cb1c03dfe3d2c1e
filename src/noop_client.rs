use async_trait::async_trait;

use crate::client::{BackendResponse, ElasticClient};
use crate::error::BoxError;

/// A client that reports every index as present and accepts every write
/// without doing any I/O.
///
/// Useful for measuring the overhead of the hook and layer themselves, and
/// for tests that don't care about persistence.
#[derive(Clone, Debug, Default)]
pub struct NoopClient;

#[async_trait]
impl ElasticClient for NoopClient {
    async fn index_exists(&self, _index: &str) -> Result<u16, BoxError> {
        Ok(200)
    }

    async fn create_index(&self, _index: &str) -> Result<BackendResponse, BoxError> {
        Ok(BackendResponse::new(200, ""))
    }

    async fn index_document(&self, _index: &str, _body: Vec<u8>) -> Result<BackendResponse, BoxError> {
        Ok(BackendResponse::new(201, ""))
    }
}
