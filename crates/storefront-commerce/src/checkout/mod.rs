//! Checkout module.
//!
//! Contains the checkout form, the cart-to-order transaction, and orders.

mod address;
mod checkout;
mod form;
mod order;

pub use address::{Address, Contact};
pub use checkout::Checkout;
pub use form::{CheckoutDetails, CheckoutForm, FieldError, ValidationErrors};
pub use order::{Order, OrderLine, OrderStatus, Payment};
