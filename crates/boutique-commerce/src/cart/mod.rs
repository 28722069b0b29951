//! Shopping cart module.
//!
//! Contains the cart, its line items and their identity keys, pricing,
//! and (with the `storage` feature) the persisted cart container.

mod attributes;
mod cart;
mod key;
mod pricing;
#[cfg(feature = "storage")]
mod store;

pub use attributes::{AttributeOption, SelectedAttributes};
pub use cart::{Cart, CartCandidate, LineItem, MAX_QUANTITY_PER_ITEM};
pub use key::ItemKey;
pub use pricing::{CartPricing, LineItemPricing};
#[cfg(feature = "storage")]
pub use store::{CartStore, DEFAULT_CART_KEY};
