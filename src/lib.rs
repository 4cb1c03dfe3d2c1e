pub mod record;
pub mod document;
pub mod error;
pub mod index;
pub mod client;
pub mod delivery;
pub mod hook;
pub mod layer;
pub mod dsn;

#[cfg(feature = "http")]
pub mod http;

pub mod init;
pub mod noop_client;

#[cfg(test)]
mod testing;

pub use client::{BackendResponse, ElasticClient};
pub use delivery::{Delivery, SpawnDelivery, SyncDelivery};
pub use error::{BoxError, HookError};
pub use hook::{ElasticHook, HookConfig, ALL_LEVELS};
pub use record::{Entry, FieldValue, Fields, ERROR_KEY};
