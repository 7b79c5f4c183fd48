//! Commerce error types.

use crate::checkout::{OrderStatus, ValidationErrors};
use crate::ids::{OrderId, ProductId};
use crate::money::Currency;
use storefront_cache::CacheError;
use thiserror::Error;

/// Errors that can occur in cart, checkout and order operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found (or not available for sale).
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Checkout attempted with nothing to buy.
    #[error("Cart is empty")]
    EmptyCart,

    /// Requested quantity exceeds available stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Checkout form failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Order status change not allowed by the workflow.
    #[error("Invalid order status transition from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: Currency, got: Currency },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Unparseable monetary amount.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Backing store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Session cache failure.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ValidationErrors> for CommerceError {
    fn from(errors: ValidationErrors) -> Self {
        CommerceError::Validation(errors)
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = CommerceError> = std::result::Result<T, E>;
