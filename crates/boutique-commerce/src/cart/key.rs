//! Line item identity keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cart::SelectedAttributes;
use crate::ids::ProductId;

/// Marks where the product id ends in a key with attributes.
const ATTRIBUTE_SEPARATOR: &str = "-{";

/// Identity of a purchasable unit: product plus variant selection.
///
/// Two add-to-cart requests with equal keys land on the same line item.
/// The key is the bare product id when no attribute is chosen, otherwise
/// `<product_id>-<json>` where `<json>` is an object of attribute name to
/// option identifier with names in sorted order:
///
/// ```
/// use boutique_commerce::cart::{AttributeOption, ItemKey, SelectedAttributes};
/// use boutique_commerce::ProductId;
///
/// let attrs = SelectedAttributes::new()
///     .with("size", AttributeOption::with_value("M"))
///     .with("color", AttributeOption::with_id("navy"));
/// let key = ItemKey::new(&ProductId::new("P1"), &attrs);
/// assert_eq!(key.as_str(), r#"P1-{"color":"navy","size":"M"}"#);
/// ```
///
/// Product ids must not contain `-{`: `P1-{"size":"M"}` with no selection
/// would otherwise share a key with `P1` in size M. [`Cart::add_item`]
/// rejects such ids.
///
/// [`Cart::add_item`]: crate::cart::Cart::add_item
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    /// Compute the key for a product and attribute selection.
    pub fn new(product_id: &ProductId, attributes: &SelectedAttributes) -> Self {
        let canonical = attributes.canonical();
        if canonical.is_empty() {
            return Self(product_id.to_string());
        }

        let object: serde_json::Map<String, serde_json::Value> = canonical
            .into_iter()
            .map(|(name, id)| (name.to_string(), serde_json::Value::from(id)))
            .collect();
        Self(format!(
            "{}-{}",
            product_id,
            serde_json::Value::Object(object)
        ))
    }

    /// Whether `product_id` can be used as the prefix of a key.
    pub fn is_valid_product_id(product_id: &ProductId) -> bool {
        !product_id.as_str().contains(ATTRIBUTE_SEPARATOR)
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ItemKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::AttributeOption;

    #[test]
    fn test_no_attributes_is_product_id() {
        let key = ItemKey::new(&ProductId::new("P1"), &SelectedAttributes::new());
        assert_eq!(key.as_str(), "P1");
    }

    #[test]
    fn test_only_absent_attributes_is_product_id() {
        let attrs = SelectedAttributes::new().with_absent("size");
        let key = ItemKey::new(&ProductId::new("P1"), &attrs);
        assert_eq!(key.as_str(), "P1");
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a: SelectedAttributes = vec![
            ("size", Some(AttributeOption::with_value("M"))),
            ("color", Some(AttributeOption::with_value("red"))),
        ]
        .into_iter()
        .collect();
        let b: SelectedAttributes = vec![
            ("color", Some(AttributeOption::with_value("red"))),
            ("size", Some(AttributeOption::with_value("M"))),
        ]
        .into_iter()
        .collect();

        let product = ProductId::new("P1");
        assert_eq!(ItemKey::new(&product, &a), ItemKey::new(&product, &b));
    }

    #[test]
    fn test_absent_attribute_does_not_change_key() {
        let product = ProductId::new("P1");
        let plain = SelectedAttributes::new().with("size", AttributeOption::with_value("M"));
        let with_absent = plain.clone().with_absent("color");
        assert_eq!(
            ItemKey::new(&product, &plain),
            ItemKey::new(&product, &with_absent)
        );
    }

    #[test]
    fn test_product_id_with_separator_is_invalid() {
        assert!(ItemKey::is_valid_product_id(&ProductId::new("P1")));
        assert!(ItemKey::is_valid_product_id(&ProductId::new("tee-red{1}")));
        assert!(!ItemKey::is_valid_product_id(&ProductId::new(r#"P1-{"size":"M"}"#)));
    }

    #[test]
    fn test_id_wins_over_label() {
        let product = ProductId::new("P1");
        let by_id = SelectedAttributes::new().with(
            "size",
            AttributeOption {
                id: Some("sz-m".into()),
                value: None,
                label: Some("Medium".into()),
            },
        );
        assert_eq!(
            ItemKey::new(&product, &by_id).as_str(),
            r#"P1-{"size":"sz-m"}"#
        );
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let attrs = SelectedAttributes::new().with("note", AttributeOption::with_value("say \"hi\""));
        let key = ItemKey::new(&ProductId::new("P1"), &attrs);
        assert_eq!(key.as_str(), r#"P1-{"note":"say \"hi\""}"#);
    }
}
