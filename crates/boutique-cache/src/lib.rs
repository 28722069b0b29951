//! Type-safe key-value storage for the Boutique storefront.
//!
//! Plays the part of the browser's local storage: a small, durable map from
//! string keys to JSON documents. Values go through serde on the way in and
//! out, and the bytes live in a pluggable [`Store`].
//!
//! # Example
//!
//! ```rust,ignore
//! use boutique_cache::Cache;
//!
//! let cache = Cache::open_dir(".boutique")?;
//!
//! // Store a value
//! cache.set("boutique:cart", &cart)?;
//!
//! // Retrieve a value
//! let cart: Option<Cart> = cache.get("boutique:cart")?;
//!
//! // Delete a value
//! cache.delete("boutique:cart")?;
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, MemoryStore, Store};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, MemoryStore, Store};
}
