//! Cart-to-order checkout.

use crate::cart::Cart;
use crate::checkout::{CheckoutDetails, CheckoutForm, Order, OrderLine};
use crate::config::CommerceConfig;
use crate::error::{CommerceError, Result};
use crate::ids::{OrderId, UserId};
use crate::money::Money;
use crate::store::{OrderStore, StoreTransaction};

/// Turns carts into orders against an [`OrderStore`].
pub struct Checkout<'a, S> {
    store: &'a S,
    config: &'a CommerceConfig,
}

impl<'a, S: OrderStore> Checkout<'a, S> {
    pub fn new(store: &'a S, config: &'a CommerceConfig) -> Self {
        Self { store, config }
    }

    /// Place an order for everything in `cart`.
    ///
    /// Order creation, line snapshots and stock decrements happen in one store
    /// transaction. On success the cart is cleared and the new order id is
    /// returned. On any error nothing is persisted and the cart is untouched.
    #[tracing::instrument(skip(self, cart, form), fields(lines = cart.len()))]
    pub fn place_order(
        &self,
        cart: &mut Cart,
        form: &CheckoutForm,
        user_id: Option<&UserId>,
    ) -> Result<OrderId> {
        if cart.is_empty() {
            tracing::warn!("checkout rejected: cart is empty");
            return Err(CommerceError::EmptyCart);
        }
        let details = form.validate(self.config).map_err(|errors| {
            tracing::warn!(%errors, "checkout rejected: invalid form");
            CommerceError::Validation(errors)
        })?;

        let order_id = self
            .store
            .transaction(|tx| build_order(tx, cart, details, user_id))
            .inspect_err(|e| tracing::warn!(error = %e, "checkout rolled back"))?;

        cart.clear();
        tracing::info!(%order_id, "order placed");
        Ok(order_id)
    }
}

fn build_order(
    tx: &mut dyn StoreTransaction,
    cart: &Cart,
    details: CheckoutDetails,
    user_id: Option<&UserId>,
) -> Result<OrderId> {
    let mut lines = Vec::with_capacity(cart.len());
    for line in cart.lines() {
        let Some(product) = tx.product(&line.product_id)? else {
            tracing::debug!(product_id = %line.product_id, "product vanished, line skipped");
            continue;
        };
        lines.push(OrderLine::new(&product, line.unit_price, line.quantity)?);
    }
    if lines.is_empty() {
        return Err(CommerceError::EmptyCart);
    }

    for line in &lines {
        tx.decrement_stock(&line.product_id, line.quantity)?;
    }

    let order = Order::new(
        user_id.cloned(),
        details.contact,
        details.shipping_address,
        details.notes,
        lines,
        Money::zero(cart.currency),
        Money::zero(cart.currency),
    )?;
    let order_id = order.id().clone();
    tx.insert_order(order)?;
    Ok(order_id)
}
