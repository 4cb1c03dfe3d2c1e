use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::document::Document;
use crate::error::HookError;
use crate::hook::HookConfig;

/// How a built document reaches the backend.
///
/// The hook calls `deliver` once per fired entry and hands over its
/// lifecycle token; strategies that want to stop work after
/// [`ElasticHook::cancel`](crate::hook::ElasticHook::cancel) must watch it
/// themselves.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver(
        &self,
        document: &Document<'_>,
        config: &HookConfig,
        cancel: &CancellationToken,
    ) -> Result<(), HookError>;
}

/// Default strategy: one synchronous write per entry.
///
/// The write does not observe the lifecycle token, so cancelling the hook
/// never aborts an in-flight write. With `strict` unset, any response the
/// backend produces counts as delivered, error statuses included; only
/// transport failures are returned.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyncDelivery {
    strict: bool,
}

impl SyncDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like the default, but a non-2xx response becomes
    /// [`HookError::Rejected`].
    pub fn strict() -> Self {
        SyncDelivery { strict: true }
    }
}

#[async_trait]
impl Delivery for SyncDelivery {
    async fn deliver(
        &self,
        document: &Document<'_>,
        config: &HookConfig,
        _cancel: &CancellationToken,
    ) -> Result<(), HookError> {
        let body = document.to_vec()?;
        let index = (config.index)();

        let resp = config
            .client
            .index_document(&index, body)
            .await
            .map_err(HookError::Transport)?;

        if self.strict && resp.is_error() {
            return Err(HookError::Rejected {
                status: resp.status,
                body: resp.body,
            });
        }
        Ok(())
    }
}

/// Fire-and-forget strategy: encodes the document on the caller, then runs
/// the write as a tokio task and returns immediately.
///
/// Encoding errors are still returned to the caller. The write is dropped
/// if the lifecycle token is cancelled before it completes, and its outcome
/// is only reported on stderr. Must be used from within a tokio runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpawnDelivery;

#[async_trait]
impl Delivery for SpawnDelivery {
    async fn deliver(
        &self,
        document: &Document<'_>,
        config: &HookConfig,
        cancel: &CancellationToken,
    ) -> Result<(), HookError> {
        let body = document.to_vec()?;
        let index = (config.index)();
        let client = Arc::clone(&config.client);
        let cancel = cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    eprintln!("log delivery to index {} cancelled", index);
                }
                res = client.index_document(&index, body) => {
                    if let Err(e) = res {
                        eprintln!("error delivering log entry to index {}: {}", index, e);
                    }
                }
            }
        });

        Ok(())
    }
}
