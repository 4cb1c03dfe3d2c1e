use std::sync::Arc;

use tracing::{error, info, warn, Level};
use es_log_hook::{index::daily_index, init::init_tracing, http::HttpClient, ElasticHook};

#[tokio::main]
async fn main() {
    let client = Arc::new(HttpClient::new("http://localhost:9200"));

    let hook = ElasticHook::with_index_fn(
        client,
        "billing-service-1",
        vec![Level::WARN, Level::ERROR],
        daily_index("billing"),
    )
    .await
    .expect("elasticsearch index is not reachable");
    let layer = init_tracing(Arc::new(hook)).expect("set global subscriber");

    info!("elasticsearch example started");
    warn!(queue_depth = 912, "invoice queue is backing up");
    let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    error!(invoice = 981, error = &err as &(dyn std::error::Error + 'static), "invoice export failed");

    // Wait for the fired entries, then cancel the hook.
    layer.shutdown().await;
}
