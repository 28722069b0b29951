//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart, catalog and checkout operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommerceError {
    /// Quantity below the minimum of one.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Product has no attribute with this name.
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// Attribute has no option with this id or value.
    #[error("Unknown option {option} for attribute {attribute}")]
    UnknownOption { attribute: String, option: String },

    /// Option exists but is out of stock.
    #[error("Option {option} for attribute {attribute} is out of stock")]
    OptionUnavailable { attribute: String, option: String },

    /// Checkout attempted on an empty cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}
