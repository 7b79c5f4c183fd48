//! Shopping cart module.
//!
//! Contains the cart, stock-checked cart actions, and session persistence.

mod actions;
mod cart;
mod session;

pub use actions::CartActions;
pub use cart::{Cart, CartItem, CartItems, CartLine};
pub use session::CartSession;
