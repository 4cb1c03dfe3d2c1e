use async_trait::async_trait;

use crate::error::BoxError;

/// Status and body of a completed backend call.
///
/// Returned for every response the backend produced, error statuses
/// included; only transport failures surface as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: String,
}

impl BackendResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        BackendResponse {
            status,
            body: body.into(),
        }
    }

    /// `true` for any status above 299.
    pub fn is_error(&self) -> bool {
        self.status > 299
    }
}

/// Handle to the search backend's index and document API.
///
/// The hook shares one client across all concurrent deliveries and never
/// mutates it, so implementations must be safe for concurrent use.
/// Authentication and TLS belong to the implementation.
#[async_trait]
pub trait ElasticClient: Send + Sync {
    /// Ask whether `index` exists.
    ///
    /// **Returns**
    /// - `Ok(status)` with the raw status: 404 means "not found", anything
    ///   else is treated as present.
    /// - `Err(..)` if the backend could not be reached.
    async fn index_exists(&self, index: &str) -> Result<u16, BoxError>;

    /// Create `index` with backend defaults.
    async fn create_index(&self, index: &str) -> Result<BackendResponse, BoxError>;

    /// Write one JSON document into `index`.
    async fn index_document(&self, index: &str, body: Vec<u8>) -> Result<BackendResponse, BoxError>;
}
