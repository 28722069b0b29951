//! A cart that writes itself through to storage.
//!
//! [`CartStore`] is the state container the storefront passes around: it owns
//! the in-memory [`Cart`], hydrates it once when opened and saves the whole
//! cart after every mutation. Storage is best effort. A saved cart that can't
//! be read comes back as an empty cart, and a failed save is logged and
//! otherwise ignored, so shoppers never see storage errors.

use boutique_cache::{Cache, Store};
use tracing::{debug, error, warn};

use crate::cart::{Cart, CartCandidate, CartPricing, ItemKey, LineItem};
use crate::checkout::Order;
use crate::error::CommerceError;
use crate::money::{Currency, Money};

/// Storage key the storefront keeps its cart under.
pub const DEFAULT_CART_KEY: &str = "boutique:cart";

/// A [`Cart`] persisted in a [`Cache`].
#[derive(Debug)]
pub struct CartStore<S> {
    cache: Cache<S>,
    key: String,
    cart: Cart,
}

impl<S: Store> CartStore<S> {
    /// Open the cart saved under `key`, or start an empty one in `currency`.
    pub fn open(cache: Cache<S>, key: impl Into<String>, currency: Currency) -> Self {
        let key = key.into();
        let cart = hydrate(&cache, &key, currency);
        Self { cache, key, cart }
    }

    /// Throw away in-memory state and read the saved cart again.
    pub fn reload(&mut self) {
        self.cart = hydrate(&self.cache, &self.key, self.cart.currency);
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The cache the cart is saved in.
    pub fn cache(&self) -> &Cache<S> {
        &self.cache
    }

    /// See [`Cart::add_item`]. Saves on success.
    pub fn add_item(&mut self, candidate: CartCandidate) -> Result<ItemKey, CommerceError> {
        let key = self.cart.add_item(candidate)?;
        self.persist();
        Ok(key)
    }

    /// See [`Cart::remove_item`]. Saves when a line was removed.
    pub fn remove_item(&mut self, key: &ItemKey) -> Option<LineItem> {
        let removed = self.cart.remove_item(key);
        if removed.is_some() {
            self.persist();
        }
        removed
    }

    /// See [`Cart::update_quantity`]. Saves when a line changed.
    pub fn update_quantity(&mut self, key: &ItemKey, quantity: i64) -> Result<bool, CommerceError> {
        let updated = self.cart.update_quantity(key, quantity)?;
        if updated {
            self.persist();
        }
        Ok(updated)
    }

    /// Empty the cart and save.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Place an order for the cart contents, then empty and save the cart.
    ///
    /// The cart is left untouched if the order can't be built.
    pub fn checkout(&mut self, email: &str) -> Result<Order, CommerceError> {
        let order = Order::from_cart(&self.cart, email)?;
        debug!(order = %order.id, lines = order.line_items.len(), "checked out cart");
        self.cart.clear();
        self.cart.close();
        self.persist();
        Ok(order)
    }

    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        self.cart.subtotal()
    }

    pub fn item_count(&self) -> i64 {
        self.cart.item_count()
    }

    pub fn calculate_pricing(&self) -> Result<CartPricing, CommerceError> {
        self.cart.calculate_pricing()
    }

    /// Show or hide the cart drawer. Not saved.
    pub fn set_open(&mut self, open: bool) {
        if open {
            self.cart.open();
        } else {
            self.cart.close();
        }
    }

    fn persist(&self) {
        if let Err(e) = self.cache.set(&self.key, &self.cart) {
            error!(key = %self.key, error = %e, "failed to save cart");
        }
    }
}

fn hydrate<S: Store>(cache: &Cache<S>, key: &str, currency: Currency) -> Cart {
    match cache.get::<Cart>(key) {
        Ok(Some(mut cart)) => {
            let repaired = cart.repair();
            if repaired > 0 {
                warn!(key, repaired, "dropped invalid lines from saved cart");
            }
            debug!(key, lines = cart.unique_item_count(), "loaded saved cart");
            cart
        }
        Ok(None) => Cart::new(currency),
        Err(e) => {
            warn!(key, error = %e, "ignoring unreadable saved cart");
            Cart::new(currency)
        }
    }
}
