//! Cart persistence through the session store.

use storefront_cache::{Cache, Session, SessionId};

use crate::cart::Cart;
use crate::config::CommerceConfig;
use crate::error::Result;
use crate::money::Currency;

/// Loads and saves a session's cart.
pub struct CartSession {
    session: Session<Cart>,
    currency: Currency,
}

impl CartSession {
    /// Store carts in `cache` under the configured session key.
    pub fn new(cache: Cache, config: &CommerceConfig) -> Self {
        Self {
            session: Session::new(cache, config.cart_session_key.clone()),
            currency: config.currency,
        }
    }

    /// Load the session's cart, or an empty one.
    pub fn load(&self, session_id: &SessionId) -> Result<Cart> {
        let cart = self
            .session
            .get(session_id)?
            .unwrap_or_else(|| Cart::new(self.currency));
        Ok(cart)
    }

    /// Persist the cart if it changed. An empty cart deletes the stored entry.
    ///
    /// Returns whether anything was written.
    #[tracing::instrument(level = "debug", skip(self, cart), fields(session_id = %session_id))]
    pub fn save(&self, session_id: &SessionId, cart: &mut Cart) -> Result<bool> {
        if !cart.is_dirty() {
            return Ok(false);
        }

        if cart.is_empty() {
            self.session.delete(session_id)?;
            tracing::debug!("cart emptied, session entry removed");
        } else {
            self.session.set(session_id, cart)?;
            tracing::debug!(lines = cart.len(), "cart saved");
        }
        cart.mark_clean();
        Ok(true)
    }

    /// Drop the session's cart entirely.
    pub fn delete(&self, session_id: &SessionId) -> Result<()> {
        self.session.delete(session_id)?;
        Ok(())
    }
}
