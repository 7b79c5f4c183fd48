//! Key-value session storage for the Storefront cart.
//!
//! Values are stored as JSON blobs behind a [`KeyValueStore`] backend. Native
//! builds use [`MemoryKeyValueStore`]; `wasm32` builds can open the Spin
//! key-value store instead.
//!
//! # Example
//!
//! ```rust
//! use storefront_cache::{Cache, Session, SessionId};
//!
//! let cache = Cache::in_memory();
//! let cart_session = Session::<Vec<String>>::new(cache, "cart");
//! let id = SessionId::new("sess_abc");
//!
//! cart_session.set(&id, &vec!["prod-1".to_string()]).unwrap();
//! assert_eq!(cart_session.get(&id).unwrap(), Some(vec!["prod-1".to_string()]));
//! ```

mod error;
mod kv;
mod session;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use session::{Session, SessionData, SessionId};
pub use store::{KeyValueStore, MemoryKeyValueStore};

#[cfg(target_arch = "wasm32")]
pub use store::SpinKeyValueStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KeyValueStore, Session, SessionId};
}
