//! In-process store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::catalog::{Catalog, Product};
use crate::checkout::{Order, OrderStatus};
use crate::error::{CommerceError, Result};
use crate::ids::{OrderId, ProductId, UserId};
use crate::money::Money;
use crate::store::{OrderStore, StoreTransaction};

#[derive(Debug, Default)]
struct Tables {
    products: HashMap<ProductId, Product>,
    /// Append-only, in creation order.
    orders: Vec<Order>,
}

impl Tables {
    fn product_mut(&mut self, id: &ProductId) -> Result<&mut Product> {
        self.products
            .get_mut(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.clone()))
    }

    fn order_mut(&mut self, id: &OrderId) -> Result<&mut Order> {
        self.orders
            .iter_mut()
            .find(|o| o.id() == id)
            .ok_or_else(|| CommerceError::OrderNotFound(id.clone()))
    }
}

/// Catalog stock and orders held in memory behind one lock.
///
/// A transaction holds the lock for its whole duration, so concurrent
/// checkouts run one after another and can never oversell.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| CommerceError::Storage("store lock poisoned".to_string()))
    }

    /// Insert or replace a product.
    pub fn insert_product(&self, product: Product) -> Result<()> {
        if product.stock_quantity < 0 {
            return Err(CommerceError::InvalidQuantity(product.stock_quantity));
        }
        ensure_non_negative(&product.price)?;
        if let Some(ref cap) = product.compare_at_price {
            ensure_non_negative(cap)?;
        }
        self.tables()?.products.insert(product.id.clone(), product);
        Ok(())
    }

    /// Change a product's catalog price. Carts keep their snapshot.
    pub fn set_price(&self, id: &ProductId, price: Money) -> Result<()> {
        ensure_non_negative(&price)?;
        self.tables()?.product_mut(id)?.price = price;
        Ok(())
    }

    /// Overwrite a product's stock level.
    pub fn set_stock(&self, id: &ProductId, stock_quantity: i64) -> Result<()> {
        if stock_quantity < 0 {
            return Err(CommerceError::InvalidQuantity(stock_quantity));
        }
        self.tables()?.product_mut(id)?.stock_quantity = stock_quantity;
        Ok(())
    }

    /// Delete a product from the catalog. Existing orders are unaffected.
    pub fn remove_product(&self, id: &ProductId) -> Result<Option<Product>> {
        Ok(self.tables()?.products.remove(id))
    }

    /// Look up an order.
    pub fn order(&self, id: &OrderId) -> Result<Order> {
        self.tables()?
            .orders
            .iter()
            .find(|o| o.id() == id)
            .cloned()
            .ok_or_else(|| CommerceError::OrderNotFound(id.clone()))
    }

    /// Look up an order owned by `user_id`.
    ///
    /// Someone else's order is reported as not found.
    pub fn order_for_user(&self, id: &OrderId, user_id: &UserId) -> Result<Order> {
        let order = self.order(id)?;
        if order.user_id() != Some(user_id) {
            return Err(CommerceError::OrderNotFound(id.clone()));
        }
        Ok(order)
    }

    /// A user's order history, newest first.
    pub fn orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        Ok(self
            .tables()?
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id() == Some(user_id))
            .cloned()
            .collect())
    }

    /// Every order, oldest first.
    pub fn orders(&self) -> Result<Vec<Order>> {
        Ok(self.tables()?.orders.clone())
    }

    /// Move an order along its status workflow.
    #[tracing::instrument(level = "debug", skip(self), fields(order_id = %id))]
    pub fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        let mut tables = self.tables()?;
        let order = tables.order_mut(id)?;
        order.transition_to(status)?;
        tracing::info!(status = %status, "order status updated");
        Ok(order.clone())
    }

    /// Record a payment against an order.
    pub fn mark_order_paid(
        &self,
        id: &OrderId,
        method: &str,
        payment_id: &str,
    ) -> Result<Order> {
        let mut tables = self.tables()?;
        let order = tables.order_mut(id)?;
        order.mark_paid(method, payment_id);
        Ok(order.clone())
    }
}

fn ensure_non_negative(price: &Money) -> Result<()> {
    if price.is_negative() {
        return Err(CommerceError::InvalidAmount(price.display_amount()));
    }
    Ok(())
}

impl Catalog for MemoryStore {
    fn product(&self, id: &ProductId) -> Result<Option<Product>> {
        Ok(self.tables()?.products.get(id).cloned())
    }
}

impl OrderStore for MemoryStore {
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<T>,
    {
        let mut tables = self.tables()?;
        let mut tx = MemoryTransaction {
            tables: &*tables,
            staged_stock: HashMap::new(),
            staged_orders: Vec::new(),
        };

        let value = match f(&mut tx) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "transaction rolled back");
                return Err(e);
            }
        };

        let MemoryTransaction {
            staged_stock,
            staged_orders,
            ..
        } = tx;
        for (id, stock) in staged_stock {
            tables.product_mut(&id)?.stock_quantity = stock;
        }
        tables.orders.extend(staged_orders);
        tracing::debug!("transaction committed");
        Ok(value)
    }
}

/// Writes staged against a locked snapshot, applied on commit.
struct MemoryTransaction<'a> {
    tables: &'a Tables,
    staged_stock: HashMap<ProductId, i64>,
    staged_orders: Vec<Order>,
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn product(&self, id: &ProductId) -> Result<Option<Product>> {
        Ok(self.tables.products.get(id).map(|product| {
            let mut product = product.clone();
            if let Some(&stock) = self.staged_stock.get(id) {
                product.stock_quantity = stock;
            }
            product
        }))
    }

    fn decrement_stock(&mut self, id: &ProductId, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let available = match self.staged_stock.get(id) {
            Some(&stock) => stock,
            None => {
                self.tables
                    .products
                    .get(id)
                    .ok_or_else(|| CommerceError::ProductNotFound(id.clone()))?
                    .stock_quantity
            }
        };

        if available < quantity {
            return Err(CommerceError::InsufficientStock {
                product_id: id.clone(),
                requested: quantity,
                available,
            });
        }
        self.staged_stock.insert(id.clone(), available - quantity);
        Ok(())
    }

    fn insert_order(&mut self, order: Order) -> Result<()> {
        let duplicate = self
            .tables
            .orders
            .iter()
            .chain(&self.staged_orders)
            .any(|o| o.id() == order.id());
        if duplicate {
            return Err(CommerceError::Storage(format!(
                "order {} already exists",
                order.id()
            )));
        }
        self.staged_orders.push(order);
        Ok(())
    }
}
