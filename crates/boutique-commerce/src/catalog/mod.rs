//! Product catalog module.
//!
//! Contains products and the variant attributes shoppers pick from.

mod product;

pub use product::{Product, VariantAttribute, VariantOption};
