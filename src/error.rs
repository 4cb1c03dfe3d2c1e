use std::error::Error;

use crate::dsn::DsnError;

/// Boxed error returned by backend clients for transport-level failures.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Errors produced while provisioning the hook or delivering an entry.
#[derive(thiserror::Error, Debug)]
pub enum HookError {
    /// Index creation failed, either at the transport level or because the
    /// backend answered with an error status. The cause is not kept.
    #[error("cannot create index")]
    CannotCreateIndex,

    /// The backend could not be reached (connection refused, timeout, reset).
    #[error(transparent)]
    Transport(BoxError),

    /// The document could not be encoded as JSON; nothing was written.
    #[error("failed to encode log document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Only produced by strict delivery: the backend answered with a
    /// non-success status.
    #[error("backend rejected document with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error(transparent)]
    Dsn(#[from] DsnError),
}
