//! Variant attributes selected for a line item.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The option a shopper picked for one attribute (e.g. Size: M).
///
/// Any of the three fields may be missing; the most specific one present
/// identifies the option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeOption {
    /// Catalog identifier of the option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Machine value (e.g. "M", "navy").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Display label (e.g. "Medium", "Navy Blue").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AttributeOption {
    /// Option identified by catalog id only.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Option identified by value only.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Option identified by label only.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// The most specific identifier: id, else value, else label.
    ///
    /// Empty strings count as missing.
    pub fn identifier(&self) -> Option<&str> {
        [&self.id, &self.value, &self.label]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|s| !s.is_empty())
    }

    /// Text suitable for showing to a shopper: label, else value, else id.
    pub fn display_text(&self) -> Option<&str> {
        [&self.label, &self.value, &self.id]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|s| !s.is_empty())
    }
}

/// Attribute-type name to chosen option, or `None` when nothing was chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedAttributes(BTreeMap<String, Option<AttributeOption>>);

impl SelectedAttributes {
    /// No attributes selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a choice for `name`, replacing any earlier one.
    pub fn insert(&mut self, name: impl Into<String>, option: Option<AttributeOption>) {
        self.0.insert(name.into(), option);
    }

    /// Builder form of [`insert`](Self::insert) with a chosen option.
    pub fn with(mut self, name: impl Into<String>, option: AttributeOption) -> Self {
        self.insert(name, Some(option));
        self
    }

    /// Builder form recording `name` as present but unchosen.
    pub fn with_absent(mut self, name: impl Into<String>) -> Self {
        self.insert(name, None);
        self
    }

    /// Look up the choice for `name`.
    pub fn get(&self, name: &str) -> Option<&AttributeOption> {
        self.0.get(name).and_then(Option::as_ref)
    }

    /// Iterate every recorded attribute, including unchosen ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&AttributeOption>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Number of recorded attributes, including unchosen ones.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical name -> identifier map used for line item identity.
    ///
    /// Unchosen attributes and options without any identifier are dropped.
    /// Names come back in sorted order.
    pub fn canonical(&self) -> BTreeMap<&str, &str> {
        self.0
            .iter()
            .filter_map(|(name, option)| {
                let id = option.as_ref()?.identifier()?;
                Some((name.as_str(), id))
            })
            .collect()
    }

    /// Human-readable variant title (e.g. "Navy / M"), `None` if nothing chosen.
    pub fn title(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .0
            .values()
            .filter_map(|option| option.as_ref()?.display_text())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" / "))
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Option<AttributeOption>)> for SelectedAttributes {
    fn from_iter<I: IntoIterator<Item = (K, Option<AttributeOption>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_precedence() {
        let full = AttributeOption {
            id: Some("opt-1".into()),
            value: Some("M".into()),
            label: Some("Medium".into()),
        };
        assert_eq!(full.identifier(), Some("opt-1"));

        let no_id = AttributeOption {
            id: None,
            value: Some("M".into()),
            label: Some("Medium".into()),
        };
        assert_eq!(no_id.identifier(), Some("M"));

        assert_eq!(AttributeOption::with_label("Medium").identifier(), Some("Medium"));
        assert_eq!(AttributeOption::default().identifier(), None);
    }

    #[test]
    fn test_empty_id_falls_through() {
        let option = AttributeOption {
            id: Some(String::new()),
            value: Some("L".into()),
            label: None,
        };
        assert_eq!(option.identifier(), Some("L"));
    }

    #[test]
    fn test_canonical_drops_absent_and_unidentified() {
        let attrs = SelectedAttributes::new()
            .with("size", AttributeOption::with_value("M"))
            .with_absent("color")
            .with("fit", AttributeOption::default());

        let canonical = attrs.canonical();
        assert_eq!(canonical.len(), 1);
        assert_eq!(canonical.get("size"), Some(&"M"));
    }

    #[test]
    fn test_title_uses_labels() {
        let attrs = SelectedAttributes::new()
            .with(
                "color",
                AttributeOption {
                    id: Some("c-9".into()),
                    value: Some("navy".into()),
                    label: Some("Navy".into()),
                },
            )
            .with("size", AttributeOption::with_value("M"));

        assert_eq!(attrs.title().as_deref(), Some("Navy / M"));
        assert_eq!(SelectedAttributes::new().title(), None);
    }

    #[test]
    fn test_serializes_absent_as_null() {
        let attrs = SelectedAttributes::new()
            .with("size", AttributeOption::with_value("M"))
            .with_absent("color");
        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(json, r#"{"color":null,"size":{"value":"M"}}"#);
    }
}
