//! Product and variant attribute types.

use crate::cart::{AttributeOption, CartCandidate, SelectedAttributes};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product as shown on the storefront.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Price of one unit. Variants share it.
    pub price: Money,
    /// Primary image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Selectable dimensions such as size or color.
    #[serde(default)]
    pub attributes: Vec<VariantAttribute>,
}

impl Product {
    /// Create a product with no variant attributes.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image_url: None,
            attributes: Vec::new(),
        }
    }

    /// Add a selectable attribute.
    pub fn add_attribute(&mut self, attribute: VariantAttribute) {
        self.attributes.push(attribute);
    }

    /// Look up an attribute by name (case-insensitive).
    pub fn attribute(&self, name: &str) -> Option<&VariantAttribute> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Check if this product has variant attributes.
    pub fn has_variants(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Build an add-to-cart candidate from a shopper's selection.
    ///
    /// `selection` pairs an attribute name with an option id or value.
    /// Attributes the shopper left unpicked are recorded as absent, so they
    /// don't affect the line item key.
    pub fn candidate(
        &self,
        selection: &[(&str, &str)],
        quantity: i64,
    ) -> Result<CartCandidate, CommerceError> {
        let mut selected = SelectedAttributes::new();
        for attribute in &self.attributes {
            selected.insert(attribute.name.clone(), None);
        }

        for (name, choice) in selection {
            let attribute = self
                .attribute(name)
                .ok_or_else(|| CommerceError::UnknownAttribute(name.to_string()))?;
            let option =
                attribute
                    .option(choice)
                    .ok_or_else(|| CommerceError::UnknownOption {
                        attribute: attribute.name.clone(),
                        option: choice.to_string(),
                    })?;
            if !option.in_stock {
                return Err(CommerceError::OptionUnavailable {
                    attribute: attribute.name.clone(),
                    option: option.display_name().to_string(),
                });
            }
            selected.insert(attribute.name.clone(), Some(option.to_selection()));
        }

        let mut candidate = CartCandidate::new(self.id.clone(), self.name.clone(), self.price)
            .with_quantity(quantity)
            .with_attributes(selected);
        candidate.image_url = self.image_url.clone();
        Ok(candidate)
    }
}

/// A selectable product dimension (e.g., Size).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantAttribute {
    /// Attribute name (e.g., "size", "color").
    pub name: String,
    /// Options in display order.
    pub options: Vec<VariantOption>,
}

impl VariantAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    /// Builder: append an option.
    pub fn with_option(mut self, option: VariantOption) -> Self {
        self.options.push(option);
        self
    }

    /// Find an option by id or value.
    pub fn option(&self, choice: &str) -> Option<&VariantOption> {
        self.options
            .iter()
            .find(|o| o.id == choice)
            .or_else(|| self.options.iter().find(|o| o.value == choice))
    }

    /// Options that can currently be bought.
    pub fn available_options(&self) -> impl Iterator<Item = &VariantOption> {
        self.options.iter().filter(|o| o.in_stock)
    }
}

/// One option of a variant attribute (e.g., Size: M).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VariantOption {
    /// Catalog identifier.
    pub id: String,
    /// Machine value (e.g., "M").
    pub value: String,
    /// Display label (e.g., "Medium").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether the option can be bought.
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

impl VariantOption {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            label: None,
            in_stock: true,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self
    }

    /// Label if set, otherwise value.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }

    /// The option as recorded on a cart line.
    pub fn to_selection(&self) -> AttributeOption {
        AttributeOption {
            id: Some(self.id.clone()),
            value: Some(self.value.clone()),
            label: self.label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn dress() -> Product {
        let mut product = Product::new(
            "dress-01",
            "Wrap Dress",
            Money::new(8900, Currency::USD),
        );
        product.image_url = Some("https://cdn.example.com/dress.jpg".to_string());
        product.add_attribute(
            VariantAttribute::new("size")
                .with_option(VariantOption::new("sz-s", "S").with_label("Small"))
                .with_option(VariantOption::new("sz-m", "M").with_label("Medium"))
                .with_option(VariantOption::new("sz-l", "L").out_of_stock()),
        );
        product.add_attribute(
            VariantAttribute::new("color")
                .with_option(VariantOption::new("c-red", "red"))
                .with_option(VariantOption::new("c-black", "black")),
        );
        product
    }

    #[test]
    fn test_candidate_from_selection() {
        let candidate = dress().candidate(&[("size", "M"), ("Color", "c-red")], 2).unwrap();

        assert_eq!(candidate.quantity, 2);
        assert_eq!(candidate.unit_price.amount_cents, 8900);
        assert_eq!(
            candidate.image_url.as_deref(),
            Some("https://cdn.example.com/dress.jpg")
        );
        assert_eq!(
            candidate.key().as_str(),
            r#"dress-01-{"color":"c-red","size":"sz-m"}"#
        );
    }

    #[test]
    fn test_unpicked_attribute_is_absent() {
        let candidate = dress().candidate(&[("size", "sz-s")], 1).unwrap();
        assert!(candidate.selected_attributes.get("color").is_none());
        assert_eq!(candidate.selected_attributes.len(), 2);
        assert_eq!(candidate.key().as_str(), r#"dress-01-{"size":"sz-s"}"#);
    }

    #[test]
    fn test_out_of_stock_rejected() {
        let result = dress().candidate(&[("size", "L")], 1);
        assert_eq!(
            result,
            Err(CommerceError::OptionUnavailable {
                attribute: "size".to_string(),
                option: "L".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_attribute_and_option() {
        assert_eq!(
            dress().candidate(&[("fabric", "silk")], 1),
            Err(CommerceError::UnknownAttribute("fabric".to_string()))
        );
        assert!(matches!(
            dress().candidate(&[("size", "XXL")], 1),
            Err(CommerceError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_available_options() {
        let product = dress();
        let sizes: Vec<&str> = product
            .attribute("size")
            .unwrap()
            .available_options()
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(sizes, vec!["S", "M"]);
    }
}
