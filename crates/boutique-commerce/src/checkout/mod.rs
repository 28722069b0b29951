//! Checkout module.
//!
//! Turns a cart into a placed order.

mod order;

pub use order::{Order, OrderLineItem};
