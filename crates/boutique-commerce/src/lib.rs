//! Storefront domain types and cart state for Boutique.
//!
//! This crate provides the pieces a fashion storefront needs between the
//! product page and the order:
//!
//! - **Catalog**: Products and their variant attributes (size, color, ...)
//! - **Cart**: Line items keyed by product and variant selection, pricing
//! - **Checkout**: Turning a cart into an order
//!
//! With the default `storage` feature, [`cart::CartStore`] keeps the cart
//! in a `boutique-cache` store and saves it after every change.
//!
//! # Example
//!
//! ```rust
//! use boutique_commerce::prelude::*;
//!
//! let mut product = Product::new("tee-01", "Linen Tee", Money::new(3500, Currency::USD));
//! product.add_attribute(
//!     VariantAttribute::new("size")
//!         .with_option(VariantOption::new("sz-m", "M"))
//!         .with_option(VariantOption::new("sz-l", "L")),
//! );
//!
//! let mut cart = Cart::new(Currency::USD);
//! let key = cart.add_item(product.candidate(&[("size", "M")], 2).unwrap()).unwrap();
//! cart.add_item(product.candidate(&[("size", "M")], 1).unwrap()).unwrap();
//!
//! assert_eq!(cart.unique_item_count(), 1);
//! assert_eq!(cart.get_item(&key).unwrap().quantity, 3);
//! assert_eq!(cart.subtotal().unwrap().display(), "$105.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod cart;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Product, VariantAttribute, VariantOption};

    // Cart
    pub use crate::cart::{
        AttributeOption, Cart, CartCandidate, CartPricing, ItemKey, LineItem, LineItemPricing,
        SelectedAttributes, MAX_QUANTITY_PER_ITEM,
    };
    #[cfg(feature = "storage")]
    pub use crate::cart::{CartStore, DEFAULT_CART_KEY};

    // Checkout
    pub use crate::checkout::{Order, OrderLineItem};
}
