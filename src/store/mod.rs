//! Time-bounded presence store with pluggable backends.
//!
//! The registry depends only on [`StoreBackend`]: get, put-with-expiry and
//! delete. Backends differ in how they express expiry; the trait normalizes
//! all of them to "time from now".
//!
//! - **MemoryBackend**: process memory, `Instant` deadlines
//! - **RedbBackend**: durable embedded database, deadline stored with the value
//! - **RedisBackend**: native `SET ... EX` (feature `redis`)
//! - **BlobBackend**: one file per key, deadline stored with the value
//!
//! # Example
//!
//! ```ignore
//! use pulse::store::PresenceStore;
//! use std::time::Duration;
//!
//! let store = PresenceStore::memory();
//! store.put("srv_pub_a3a9e1ed9732", b"{}", Some(Duration::from_secs(300))).await?;
//! ```
//!
//! # Custom Backends
//!
//! ```ignore
//! use pulse::store::{PresenceStore, StoreBackend};
//!
//! struct DynamoBackend { /* ... */ }
//! impl StoreBackend for DynamoBackend { /* ... */ }
//!
//! let store = PresenceStore::custom(DynamoBackend::new());
//! ```

mod backend;
mod blob;
mod memory;
mod redb;
#[cfg(feature = "redis")]
mod redis;
mod handle;
mod types;

#[cfg(test)]
mod tests;

pub use backend::StoreBackend;
pub use blob::BlobBackend;
pub use memory::MemoryBackend;
pub use self::redb::RedbBackend;
#[cfg(feature = "redis")]
pub use self::redis::RedisBackend;
pub use handle::PresenceStore;
