//! Order and stock persistence.
//!
//! Checkout writes through an [`OrderStore`]: everything it does happens
//! inside one [`OrderStore::transaction`] call, so a failure anywhere leaves
//! no order and no stock change behind.

mod memory;

pub use memory::MemoryStore;

use crate::catalog::Product;
use crate::checkout::Order;
use crate::error::Result;
use crate::ids::ProductId;

/// Storage that can run checkout atomically.
pub trait OrderStore {
    /// Run `f` in a transaction.
    ///
    /// Writes made through the transaction become visible only if `f`
    /// returns `Ok`. An `Err` discards them and is returned unchanged.
    /// Transactions are serializable with respect to each other.
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<T>;
}

/// Operations available inside a store transaction.
pub trait StoreTransaction {
    /// Read a product, including stock changes made earlier in this
    /// transaction.
    fn product(&self, id: &ProductId) -> Result<Option<Product>>;

    /// Take `quantity` units out of stock.
    ///
    /// Fails with `InsufficientStock` if stock would go negative.
    fn decrement_stock(&mut self, id: &ProductId, quantity: i64) -> Result<()>;

    /// Persist a new order.
    fn insert_order(&mut self, order: Order) -> Result<()>;
}
