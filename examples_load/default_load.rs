use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, Level};

use es_log_hook::init::{init_tracing_with_config, LayerConfig};
use es_log_hook::noop_client::NoopClient;
use es_log_hook::ElasticHook;

#[tokio::main]
async fn main() {
    let hook = ElasticHook::new(Arc::new(NoopClient), "load-test", vec![Level::ERROR], "load")
        .await
        .expect("noop client never fails");
    let layer = init_tracing_with_config(Arc::new(hook), LayerConfig { enable_stdout: false })
        .expect("set global subscriber");

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        error!(iteration = i, "default load test error");
    }

    let elapsed = start.elapsed();
    println!("sent {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    layer.flush().await;
    println!("all fires completed in {:?}, {} failed",
        start.elapsed(),
        layer.failed_events.load(Ordering::Relaxed)
    );
}
