//! Cart pricing calculations.

use crate::cart::ItemKey;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Sum of quantities.
    pub item_count: i64,
    /// Per-line-item pricing breakdown.
    pub line_items: Vec<LineItemPricing>,
}

impl CartPricing {
    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.line_items.len()
    }

    /// Check if there is nothing to pay for.
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

/// Pricing breakdown for a single line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    /// Identity key of the line.
    pub key: ItemKey,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// unit_price * quantity.
    pub total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn line(key: &str, cents: i64, quantity: i64) -> LineItemPricing {
        LineItemPricing {
            key: ItemKey::from(key),
            name: key.to_string(),
            unit_price: Money::new(cents, Currency::USD),
            quantity,
            total: Money::new(cents * quantity, Currency::USD),
        }
    }

    #[test]
    fn test_line_count() {
        let pricing = CartPricing {
            subtotal: Money::new(3500, Currency::USD),
            item_count: 4,
            line_items: vec![line("a", 500, 3), line("b", 2000, 1)],
        };

        assert_eq!(pricing.line_count(), 2);
        assert!(!pricing.is_empty());
    }

    #[test]
    fn test_empty_pricing_has_no_lines() {
        let pricing = CartPricing {
            subtotal: Money::zero(Currency::USD),
            item_count: 0,
            line_items: vec![],
        };
        assert!(pricing.is_empty());
        assert_eq!(pricing.line_count(), 0);
    }
}
