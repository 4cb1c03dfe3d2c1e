use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use es_log_hook::{
    document::Document,
    index::fixed_index,
    init::init_tracing,
    noop_client::NoopClient,
    Delivery, ElasticHook, HookConfig, HookError, ALL_LEVELS,
};

/// Example of a completely custom delivery strategy. Instead of writing to
/// the backend it prints each encoded document, and stops once the hook is
/// cancelled.
struct PrintDelivery;

#[async_trait]
impl Delivery for PrintDelivery {
    async fn deliver(
        &self,
        document: &Document<'_>,
        config: &HookConfig,
        cancel: &CancellationToken,
    ) -> Result<(), HookError> {
        if cancel.is_cancelled() {
            return Ok(());
        }
        let body = document.to_vec()?;
        println!("[{}] {}", (config.index)(), String::from_utf8_lossy(&body));
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let hook = ElasticHook::with_delivery(
        Arc::new(NoopClient),
        "custom-delivery-example",
        ALL_LEVELS.to_vec(),
        fixed_index("printed-logs"),
        Arc::new(PrintDelivery),
    )
    .await
    .expect("noop client never fails");

    let layer = init_tracing(Arc::new(hook)).expect("set global subscriber");

    info!("custom delivery example started");
    error!(db = "my-custom-db", "simulated error sent via custom delivery");

    layer.shutdown().await;
}
