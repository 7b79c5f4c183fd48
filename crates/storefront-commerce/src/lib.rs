//! Cart, checkout and order domain logic for the Storefront.
//!
//! - **Catalog**: the product snapshot and the [`Catalog`](catalog::Catalog) lookup trait
//! - **Cart**: session cart with price snapshots, stock-checked actions, session persistence
//! - **Checkout**: form validation and the atomic cart-to-order transaction
//! - **Store**: transactional order/stock storage, with an in-memory implementation
//!
//! # Example
//!
//! ```rust
//! use storefront_commerce::prelude::*;
//!
//! let config = CommerceConfig::default();
//! let store = MemoryStore::new();
//! store
//!     .insert_product(
//!         Product::new("tea", "Ilam Tea", "ilam-tea", Money::new(50000, Currency::NPR))
//!             .with_stock(10),
//!     )
//!     .unwrap();
//!
//! let mut cart = Cart::new(config.currency);
//! CartActions::new(&store)
//!     .add_product(&mut cart, &ProductId::new("tea"), 2)
//!     .unwrap();
//!
//! let form = CheckoutForm {
//!     first_name: "Sita".into(),
//!     last_name: "Sharma".into(),
//!     email: "sita@example.com".into(),
//!     phone: "9800000000".into(),
//!     address_line1: "Durbar Marg".into(),
//!     city: "Kathmandu".into(),
//!     state_province: "Bagmati".into(),
//!     postal_code: "44600".into(),
//!     ..CheckoutForm::default()
//! };
//!
//! let order_id = Checkout::new(&store, &config)
//!     .place_order(&mut cart, &form, None)
//!     .unwrap();
//!
//! let order = store.order(&order_id).unwrap();
//! assert_eq!(order.total().display(), "Rs.1000.00");
//! assert!(cart.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod store;

pub use config::CommerceConfig;
pub use error::{CommerceError, Result};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::CommerceConfig;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, Product};

    // Cart
    pub use crate::cart::{Cart, CartActions, CartItem, CartLine, CartSession};

    // Checkout
    pub use crate::checkout::{
        Address, Checkout, CheckoutForm, Contact, Order, OrderLine, OrderStatus, ValidationErrors,
    };

    // Store
    pub use crate::store::{MemoryStore, OrderStore, StoreTransaction};
}
