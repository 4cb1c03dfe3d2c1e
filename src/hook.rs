use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Level};

use crate::client::ElasticClient;
use crate::delivery::{Delivery, SyncDelivery};
use crate::document::build_document;
use crate::error::HookError;
use crate::index::{fixed_index, IndexNameFn};
use crate::record::Entry;

/// Every `tracing` level, most verbose first.
pub const ALL_LEVELS: [Level; 5] = [Level::TRACE, Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR];

/// Immutable hook settings, handed to the delivery strategy on every fire.
#[derive(Clone)]
pub struct HookConfig {
    /// Shared backend handle; never mutated by the hook.
    pub client: Arc<dyn ElasticClient>,
    /// Label of the emitting process or machine, copied into every document.
    pub host: String,
    pub levels: Vec<Level>,
    /// Resolves the destination index at call time.
    pub index: IndexNameFn,
}

impl fmt::Debug for HookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookConfig")
            .field("host", &self.host)
            .field("levels", &self.levels)
            .finish_non_exhaustive()
    }
}

/// Ships log entries one at a time into a search index.
///
/// Construction makes sure the target index exists; after that every
/// [`fire`](Self::fire) builds one document and hands it to the delivery
/// strategy. There is no buffering and no retry: failures go straight back
/// to the caller and the entry is dropped.
pub struct ElasticHook {
    config: HookConfig,
    cancel: CancellationToken,
    delivery: Arc<dyn Delivery>,
}

impl ElasticHook {
    /// Create a hook writing into a fixed index with [`SyncDelivery`].
    ///
    /// **Parameters**
    /// - `client`: backend handle, shared with the caller.
    /// - `host`: label of the emitting system.
    /// - `levels`: levels the logging framework should forward.
    /// - `index`: target index name; created if missing.
    ///
    /// **Returns**
    /// - `Err(HookError::Transport)` if the existence check could not reach
    ///   the backend.
    /// - `Err(HookError::CannotCreateIndex)` if the index was missing and
    ///   could not be created.
    pub async fn new(
        client: Arc<dyn ElasticClient>,
        host: impl Into<String>,
        levels: Vec<Level>,
        index: impl Into<String>,
    ) -> Result<Self, HookError> {
        Self::with_index_fn(client, host, levels, fixed_index(index)).await
    }

    /// Like [`new`](Self::new), with the index resolved by `index` on every
    /// write (e.g. [`daily_index`](crate::index::daily_index)). Only the
    /// name resolved at construction is provisioned.
    pub async fn with_index_fn(
        client: Arc<dyn ElasticClient>,
        host: impl Into<String>,
        levels: Vec<Level>,
        index: IndexNameFn,
    ) -> Result<Self, HookError> {
        Self::with_delivery(client, host, levels, index, Arc::new(SyncDelivery::new())).await
    }

    /// Fully parameterized constructor with a custom delivery strategy.
    pub async fn with_delivery(
        client: Arc<dyn ElasticClient>,
        host: impl Into<String>,
        levels: Vec<Level>,
        index: IndexNameFn,
        delivery: Arc<dyn Delivery>,
    ) -> Result<Self, HookError> {
        let cancel = CancellationToken::new();

        let name = index();
        if let Err(err) = provision_index(client.as_ref(), &name).await {
            cancel.cancel();
            return Err(err);
        }

        Ok(ElasticHook {
            config: HookConfig {
                client,
                host: host.into(),
                levels,
                index,
            },
            cancel,
            delivery,
        })
    }

    /// Build a hook over [`HttpClient`](crate::http::HttpClient) from a DSN
    /// such as `elasticsearch://localhost:9200/app-logs`.
    #[cfg(feature = "http")]
    pub async fn from_dsn(dsn: &str, host: impl Into<String>, levels: Vec<Level>) -> Result<Self, HookError> {
        let cfg = crate::dsn::parse_dsn(dsn)?;
        let client = Arc::new(crate::http::HttpClient::new(cfg.base_url));
        Self::new(client, host, levels, cfg.index).await
    }

    /// Deliver one entry.
    ///
    /// An error stored under [`ERROR_KEY`](crate::record::ERROR_KEY) is
    /// replaced by its message in `entry.data` before encoding.
    pub async fn fire(&self, entry: &mut Entry) -> Result<(), HookError> {
        let document = build_document(entry, &self.config.host);
        self.delivery.deliver(&document, &self.config, &self.cancel).await
    }

    /// Levels this hook accepts, as configured.
    pub fn levels(&self) -> &[Level] {
        &self.config.levels
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Cancel the lifecycle token. Idempotent and non-blocking; in-flight
    /// writes are not awaited and later fires are still attempted.
    pub fn cancel(&self) {
        debug!(host = %self.config.host, "cancelling elastic hook");
        self.cancel.cancel();
    }
}

async fn provision_index(client: &dyn ElasticClient, index: &str) -> Result<(), HookError> {
    let status = client.index_exists(index).await.map_err(HookError::Transport)?;
    if status != 404 {
        debug!(index, status, "index present");
        return Ok(());
    }

    match client.create_index(index).await {
        Ok(resp) if !resp.is_error() => {
            info!(index, "created index");
            Ok(())
        }
        Ok(resp) => {
            warn!(index, status = resp.status, body = %resp.body, "index creation rejected");
            Err(HookError::CannotCreateIndex)
        }
        Err(e) => {
            warn!(index, error = %e, "index creation failed");
            Err(HookError::CannotCreateIndex)
        }
    }
}
