//! Stock-checked cart mutations.
//!
//! [`Cart`] itself never looks at stock. These actions are what a request
//! handler calls: they resolve the product, reject inactive ones, and check
//! live stock before touching the cart.

use crate::cart::Cart;
use crate::catalog::{Catalog, Product};
use crate::error::{CommerceError, Result};
use crate::ids::ProductId;

/// Cart operations checked against a live catalog.
pub struct CartActions<'a, C: ?Sized> {
    catalog: &'a C,
}

impl<'a, C> CartActions<'a, C>
where
    C: Catalog + ?Sized,
{
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Add `quantity` units of a product to the cart.
    #[tracing::instrument(level = "debug", skip(self, cart), fields(product_id = %product_id))]
    pub fn add_product(&self, cart: &mut Cart, product_id: &ProductId, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let product = self.active_product(product_id)?;
        ensure_stock(&product, quantity)?;

        cart.add(&product, quantity, false)?;
        tracing::debug!(quantity, in_cart = cart.item_count(), "added to cart");
        Ok(())
    }

    /// Set a product's quantity. Zero or negative removes it.
    #[tracing::instrument(level = "debug", skip(self, cart), fields(product_id = %product_id))]
    pub fn set_quantity(&self, cart: &mut Cart, product_id: &ProductId, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            cart.remove(product_id);
            return Ok(());
        }
        let product = self.active_product(product_id)?;
        ensure_stock(&product, quantity)?;

        cart.update_quantity(product_id, quantity);
        Ok(())
    }

    /// Remove a product from the cart. Absent products are ignored.
    pub fn remove_product(&self, cart: &mut Cart, product_id: &ProductId) -> bool {
        cart.remove(product_id)
    }

    fn active_product(&self, product_id: &ProductId) -> Result<Product> {
        match self.catalog.product(product_id)? {
            Some(product) if product.is_active => Ok(product),
            _ => Err(CommerceError::ProductNotFound(product_id.clone())),
        }
    }
}

fn ensure_stock(product: &Product, quantity: i64) -> Result<()> {
    if !product.can_fulfill(quantity) {
        tracing::warn!(
            product_id = %product.id,
            requested = quantity,
            available = product.stock_quantity,
            "not enough stock"
        );
        return Err(CommerceError::InsufficientStock {
            product_id: product.id.clone(),
            requested: quantity,
            available: product.stock_quantity,
        });
    }
    Ok(())
}
