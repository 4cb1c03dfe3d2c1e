use crate::hook::ElasticHook;
use crate::layer::ElasticLayer;
use std::sync::Arc;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the installed subscriber.
///
/// **Fields**
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   stacked on top of [`ElasticLayer`] so events are also printed to the
///   console.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self { enable_stdout: true }
    }
}

/// Install a global `tracing` subscriber that fires events through `hook`.
///
/// **Parameters**
/// - `hook`: provisioned [`ElasticHook`]; its levels decide which events
///   are forwarded.
/// - `config`: [`LayerConfig`] controlling console output.
///
/// **Returns**
/// - `Ok(layer)`: a handle sharing state with the installed layer; await
///   [`ElasticLayer::flush`] or [`ElasticLayer::shutdown`] on it before the
///   runtime exits so pending entries are delivered.
/// - `Err(..)` if a global subscriber was already installed.
pub fn init_tracing_with_config(
    hook: Arc<ElasticHook>,
    config: LayerConfig,
) -> Result<ElasticLayer, SetGlobalDefaultError> {
    let layer = ElasticLayer::new(hook);
    let handle = layer.clone();

    // Both branches produce different subscriber types, so install each
    // one separately.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(handle)
}

/// Initialize tracing with [`LayerConfig::default`].
pub fn init_tracing(hook: Arc<ElasticHook>) -> Result<ElasticLayer, SetGlobalDefaultError> {
    init_tracing_with_config(hook, LayerConfig::default())
}
