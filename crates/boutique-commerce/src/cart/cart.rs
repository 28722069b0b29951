//! Cart and line item types.

use crate::cart::{AttributeOption, CartPricing, ItemKey, LineItemPricing, SelectedAttributes};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// A shopping cart.
///
/// Line items are unique by [`ItemKey`]. Every quantity in the cart is in
/// `1..=MAX_QUANTITY_PER_ITEM`; operations that would break that are
/// rejected and leave the cart untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Cart currency. Every line item is priced in it.
    pub currency: Currency,
    /// Items in the cart, in the order they were first added.
    items: Vec<LineItem>,
    /// Unix timestamp of last update.
    #[serde(default)]
    pub updated_at: i64,
    /// Whether the cart drawer is showing. UI state, never persisted.
    #[serde(skip)]
    open: bool,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            items: Vec::new(),
            updated_at: current_timestamp(),
            open: false,
        }
    }

    /// Add an item to the cart.
    ///
    /// If a line with the same key exists its quantity grows by the
    /// candidate's quantity; name, price and image stay as first captured.
    /// Otherwise a new line is appended. Either way the cart is marked open.
    ///
    /// Returns an error if:
    /// - Quantity is not positive
    /// - Adding would exceed MAX_QUANTITY_PER_ITEM
    /// - The unit price is not in the cart currency
    /// - The product id contains `-{` (see [`ItemKey`])
    pub fn add_item(&mut self, candidate: CartCandidate) -> Result<ItemKey, CommerceError> {
        if !ItemKey::is_valid_product_id(&candidate.product_id) {
            return Err(CommerceError::ValidationError(format!(
                "product id {} contains \"-{{\"",
                candidate.product_id
            )));
        }

        if candidate.quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(candidate.quantity));
        }

        if candidate.unit_price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: candidate.unit_price.currency.code().to_string(),
            });
        }

        let key = candidate.key();

        if let Some(existing) = self.items.iter_mut().find(|i| i.key() == key) {
            let new_quantity = existing
                .quantity
                .checked_add(candidate.quantity)
                .ok_or(CommerceError::Overflow)?;

            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }

            debug!(%key, from = existing.quantity, to = new_quantity, "merged into existing line");
            existing.quantity = new_quantity;
        } else {
            if candidate.quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    candidate.quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }

            debug!(%key, quantity = candidate.quantity, "added new line");
            self.items.push(LineItem::from(candidate));
        }

        self.open = true;
        self.touch();
        Ok(key)
    }

    /// Remove the line with this key.
    ///
    /// Returns the removed line, or `None` (cart unchanged) if no line matches.
    pub fn remove_item(&mut self, key: &ItemKey) -> Option<LineItem> {
        match self.position(key) {
            Some(index) => {
                let removed = self.items.remove(index);
                self.touch();
                Some(removed)
            }
            None => {
                warn!(%key, "remove requested for item not in cart");
                None
            }
        }
    }

    /// Set the quantity of the line with this key.
    ///
    /// Returns `Ok(false)` (cart unchanged) if no line matches. Quantities
    /// below one are rejected rather than removing the line.
    pub fn update_quantity(&mut self, key: &ItemKey, quantity: i64) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        match self.position(key) {
            Some(index) => {
                self.items[index].quantity = quantity;
                self.touch();
                Ok(true)
            }
            None => {
                warn!(%key, quantity, "quantity update for item not in cart");
                Ok(false)
            }
        }
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Identity key of a line item. Same as [`LineItem::key`].
    pub fn item_key(&self, item: &LineItem) -> ItemKey {
        item.key()
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of unique items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by key.
    pub fn get_item(&self, key: &ItemKey) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.key() == key)
    }

    /// Sum of unit price times quantity over all lines.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        let totals = self
            .items
            .iter()
            .map(LineItem::total)
            .collect::<Result<Vec<_>, _>>()?;
        Money::try_sum(totals.iter(), self.currency).ok_or(CommerceError::Overflow)
    }

    /// Calculate cart pricing.
    ///
    /// Returns error if arithmetic overflow occurs.
    pub fn calculate_pricing(&self) -> Result<CartPricing, CommerceError> {
        let line_items = self
            .items
            .iter()
            .map(|item| -> Result<LineItemPricing, CommerceError> {
                Ok(LineItemPricing {
                    key: item.key(),
                    name: item.name.clone(),
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                    total: item.total()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let subtotal = Money::try_sum(line_items.iter().map(|l| &l.total), self.currency)
            .ok_or(CommerceError::Overflow)?;

        Ok(CartPricing {
            subtotal,
            item_count: self.item_count(),
            line_items,
        })
    }

    /// Whether the cart drawer is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show the cart drawer.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the cart drawer.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Restore the cart invariants on data from an untrusted source.
    ///
    /// Drops lines with a non-positive quantity or foreign currency, caps
    /// quantities at MAX_QUANTITY_PER_ITEM and folds lines sharing a key into
    /// the first one. Returns the number of lines dropped or folded.
    pub fn repair(&mut self) -> usize {
        let before = self.items.len();
        let currency = self.currency;
        let mut repaired: Vec<LineItem> = Vec::with_capacity(before);

        for mut item in self.items.drain(..) {
            if item.quantity <= 0 || item.unit_price.currency != currency {
                continue;
            }
            item.quantity = item.quantity.min(MAX_QUANTITY_PER_ITEM);

            let key = item.key();
            match repaired.iter_mut().find(|i| i.key() == key) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .saturating_add(item.quantity)
                        .min(MAX_QUANTITY_PER_ITEM);
                }
                None => repaired.push(item),
            }
        }

        self.items = repaired;
        before - self.items.len()
    }

    fn position(&self, key: &ItemKey) -> Option<usize> {
        self.items.iter().position(|i| &i.key() == key)
    }

    fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

/// What a product page hands to the cart when the shopper clicks "add".
#[derive(Debug, Clone, PartialEq)]
pub struct CartCandidate {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    /// Defaults to 1.
    pub quantity: i64,
    pub image_url: Option<String>,
    pub selected_attributes: SelectedAttributes,
}

impl CartCandidate {
    /// Candidate for one unit with no variant selection.
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            quantity: 1,
            image_url: None,
            selected_attributes: SelectedAttributes::new(),
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Select an option for one attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, option: AttributeOption) -> Self {
        self.selected_attributes.insert(name, Some(option));
        self
    }

    /// Replace the whole attribute selection.
    pub fn with_attributes(mut self, attributes: SelectedAttributes) -> Self {
        self.selected_attributes = attributes;
        self
    }

    /// Identity key this candidate would have in a cart.
    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.product_id, &self.selected_attributes)
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name, captured when first added.
    pub name: String,
    /// Unit price, captured when first added.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// Variant selection.
    #[serde(default)]
    pub selected_attributes: SelectedAttributes,
    /// Image shown next to the line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl LineItem {
    /// Identity key of this line.
    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.product_id, &self.selected_attributes)
    }

    /// Unit price times quantity.
    pub fn total(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }

    /// Variant title such as "Navy / M".
    pub fn variant_title(&self) -> Option<String> {
        self.selected_attributes.title()
    }
}

impl From<CartCandidate> for LineItem {
    fn from(candidate: CartCandidate) -> Self {
        Self {
            product_id: candidate.product_id,
            name: candidate.name,
            unit_price: candidate.unit_price,
            quantity: candidate.quantity,
            selected_attributes: candidate.selected_attributes,
            image_url: candidate.image_url,
        }
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn shirt(size: &str) -> CartCandidate {
        CartCandidate::new("P1", "Linen Shirt", usd(4500))
            .with_attribute("size", AttributeOption::with_value(size))
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new(Currency::EUR);
        assert!(cart.is_empty());
        assert!(!cart.is_open());
        assert_eq!(cart.currency, Currency::EUR);
    }

    #[test]
    fn test_candidate_defaults_to_one() {
        let candidate = CartCandidate::new("P1", "Linen Shirt", usd(4500));
        assert_eq!(candidate.quantity, 1);
        assert_eq!(candidate.key().as_str(), "P1");
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::default();
        let first = cart.add_item(shirt("M")).unwrap();
        let second = cart.add_item(shirt("M").with_quantity(2)).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_merge_keeps_first_captured_fields() {
        let mut cart = Cart::default();
        cart.add_item(shirt("M")).unwrap();
        let mut repriced = shirt("M");
        repriced.name = "Renamed".to_string();
        repriced.unit_price = usd(1);
        cart.add_item(repriced).unwrap();

        assert_eq!(cart.items()[0].name, "Linen Shirt");
        assert_eq!(cart.items()[0].unit_price, usd(4500));
    }

    #[test]
    fn test_variants_are_distinct_lines() {
        let mut cart = Cart::default();
        let m = cart.add_item(shirt("M")).unwrap();
        let l = cart.add_item(shirt("L")).unwrap();

        assert_ne!(m, l);
        assert_eq!(cart.unique_item_count(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_opens_cart() {
        let mut cart = Cart::default();
        cart.add_item(shirt("M")).unwrap();
        assert!(cart.is_open());
        cart.close();
        assert!(!cart.is_open());
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::default();
        let a = cart.add_item(shirt("M")).unwrap();
        let b = cart.add_item(CartCandidate::new("P2", "Belt", usd(2000))).unwrap();

        let removed = cart.remove_item(&a).unwrap();
        assert_eq!(removed.name, "Linen Shirt");
        assert_eq!(cart.unique_item_count(), 1);
        assert!(cart.get_item(&b).is_some());
        assert!(cart.get_item(&a).is_none());
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let mut cart = Cart::default();
        cart.add_item(shirt("M")).unwrap();
        let before = cart.clone();

        assert!(cart.remove_item(&ItemKey::from("nope")).is_none());
        assert_eq!(cart.items(), before.items());
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::default();
        let key = cart.add_item(shirt("M")).unwrap();

        assert!(cart.update_quantity(&key, 5).unwrap());
        assert_eq!(cart.item_count(), 5);
        assert!(!cart.update_quantity(&ItemKey::from("nope"), 2).unwrap());
    }

    #[test]
    fn test_update_quantity_rejects_below_one() {
        let mut cart = Cart::default();
        let key = cart.add_item(shirt("M").with_quantity(2)).unwrap();

        assert_eq!(
            cart.update_quantity(&key, 0),
            Err(CommerceError::InvalidQuantity(0))
        );
        assert_eq!(
            cart.update_quantity(&key, -3),
            Err(CommerceError::InvalidQuantity(-3))
        );
        assert_eq!(cart.get_item(&key).unwrap().quantity, 2);
    }

    #[test]
    fn test_invalid_quantity() {
        let mut cart = Cart::default();
        let result = cart.add_item(shirt("M").with_quantity(0));
        assert_eq!(result, Err(CommerceError::InvalidQuantity(0)));
        assert!(cart.is_empty());
        assert!(!cart.is_open());
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::default();
        cart.add_item(shirt("M").with_quantity(MAX_QUANTITY_PER_ITEM))
            .unwrap();
        let result = cart.add_item(shirt("M"));
        assert_eq!(
            result,
            Err(CommerceError::QuantityExceedsLimit(
                MAX_QUANTITY_PER_ITEM + 1,
                MAX_QUANTITY_PER_ITEM
            ))
        );
        assert_eq!(cart.item_count(), MAX_QUANTITY_PER_ITEM);
    }

    #[test]
    fn test_ambiguous_product_id_is_rejected() {
        let mut cart = Cart::default();
        let sized = cart.add_item(shirt("M")).unwrap();
        assert_eq!(sized.as_str(), r#"P1-{"size":"M"}"#);

        let lookalike = CartCandidate::new(r#"P1-{"size":"M"}"#, "Lookalike", usd(100));
        assert_eq!(lookalike.key(), sized);
        assert!(matches!(
            cart.add_item(lookalike),
            Err(CommerceError::ValidationError(_))
        ));
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].name, "Linen Shirt");
    }

    #[test]
    fn test_update_quantity_limit() {
        let mut cart = Cart::default();
        let key = cart.add_item(shirt("M").with_quantity(3)).unwrap();

        assert!(cart.update_quantity(&key, MAX_QUANTITY_PER_ITEM).unwrap());
        assert_eq!(
            cart.update_quantity(&key, MAX_QUANTITY_PER_ITEM + 1),
            Err(CommerceError::QuantityExceedsLimit(
                MAX_QUANTITY_PER_ITEM + 1,
                MAX_QUANTITY_PER_ITEM
            ))
        );
        assert_eq!(cart.get_item(&key).unwrap().quantity, MAX_QUANTITY_PER_ITEM);
    }

    #[test]
    fn test_currency_mismatch() {
        let mut cart = Cart::new(Currency::USD);
        let result = cart.add_item(CartCandidate::new(
            "P1",
            "Scarf",
            Money::new(100, Currency::EUR),
        ));
        assert!(matches!(result, Err(CommerceError::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::default();
        cart.add_item(CartCandidate::new("A", "Tee", usd(100)).with_quantity(2))
            .unwrap();
        cart.add_item(CartCandidate::new("B", "Socks", usd(50)))
            .unwrap();

        assert_eq!(cart.subtotal().unwrap(), usd(250));
        assert_eq!(cart.item_count(), 3);

        let pricing = cart.calculate_pricing().unwrap();
        assert_eq!(pricing.subtotal, usd(250));
        assert_eq!(pricing.line_items[0].total, usd(200));
    }

    #[test]
    fn test_empty_subtotal_is_zero() {
        let cart = Cart::new(Currency::GBP);
        assert_eq!(cart.subtotal().unwrap(), Money::zero(Currency::GBP));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = Cart::default();
        cart.add_item(shirt("M")).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_item_key_matches_returned_key() {
        let mut cart = Cart::default();
        let key = cart.add_item(shirt("S")).unwrap();
        let item = &cart.items()[0];
        assert_eq!(cart.item_key(item), key);
    }

    #[test]
    fn test_serialized_cart_omits_open_flag() {
        let mut cart = Cart::default();
        cart.add_item(shirt("M")).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        assert!(!json.contains("open"));

        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.items(), cart.items());
        assert!(!restored.is_open());
    }

    #[test]
    fn test_repair_folds_duplicates_and_drops_bad_lines() {
        let json = r#"{
            "currency": "USD",
            "items": [
                {"product_id": "P1", "name": "Tee", "unit_price": {"amount_cents": 100, "currency": "USD"}, "quantity": 2},
                {"product_id": "P1", "name": "Tee", "unit_price": {"amount_cents": 100, "currency": "USD"}, "quantity": 3},
                {"product_id": "P2", "name": "Cap", "unit_price": {"amount_cents": 100, "currency": "USD"}, "quantity": 0},
                {"product_id": "P3", "name": "Bag", "unit_price": {"amount_cents": 100, "currency": "EUR"}, "quantity": 1}
            ]
        }"#;
        let mut cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.repair(), 3);
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
    }
}
