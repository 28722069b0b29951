//! Order types.

use crate::cart::{Cart, SelectedAttributes};
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A placed order: a frozen copy of the cart at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-readable order number.
    pub order_number: String,
    /// Customer email.
    pub email: String,
    /// Items in the order.
    pub line_items: Vec<OrderLineItem>,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Order currency.
    pub currency: Currency,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

impl Order {
    /// Snapshot a cart into an order.
    ///
    /// Fails on an empty cart or an email without an `@`.
    pub fn from_cart(cart: &Cart, email: &str) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(CommerceError::ValidationError(format!(
                "invalid email address: {:?}",
                email
            )));
        }

        let line_items = cart
            .items()
            .iter()
            .map(|item| -> Result<OrderLineItem, CommerceError> {
                Ok(OrderLineItem {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    variant_title: item.variant_title(),
                    selected_attributes: item.selected_attributes.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    total_price: item.total()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: OrderId::generate(),
            order_number: Self::generate_order_number(),
            email: email.to_string(),
            line_items,
            subtotal: cart.subtotal()?,
            currency: cart.currency,
            created_at: current_timestamp(),
        })
    }

    /// Generate a new order number.
    pub fn generate_order_number() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        format!("ORD-{}", ts)
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }
}

/// A line item in an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name at time of order.
    pub name: String,
    /// Variant title (e.g., "Navy / M").
    pub variant_title: Option<String>,
    /// Variant selection at time of order.
    pub selected_attributes: SelectedAttributes,
    /// Quantity ordered.
    pub quantity: i64,
    /// Unit price at time of order.
    pub unit_price: Money,
    /// Total price for this line.
    pub total_price: Money,
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
