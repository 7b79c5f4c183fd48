//! Product catalog module.
//!
//! The catalog itself is owned elsewhere; this module holds the product
//! snapshot the cart and checkout read, and the lookup trait they read it
//! through.

mod product;

pub use product::Product;

use crate::error::Result;
use crate::ids::ProductId;

/// Read access to live catalog data.
pub trait Catalog {
    /// Look up a product by id. `Ok(None)` means it no longer exists.
    fn product(&self, id: &ProductId) -> Result<Option<Product>>;
}
