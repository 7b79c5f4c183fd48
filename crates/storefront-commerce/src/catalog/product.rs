//! Product snapshot type.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product as seen by the cart and checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// URL-friendly slug (unique).
    pub slug: String,
    /// Current selling price.
    pub price: Money,
    /// Compare-at price (original price for showing discounts).
    pub compare_at_price: Option<Money>,
    /// Units available to sell. Never negative.
    pub stock_quantity: i64,
    /// Whether the product can be added to a cart.
    pub is_active: bool,
}

impl Product {
    /// Create an active product with no stock.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        slug: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            price,
            compare_at_price: None,
            stock_quantity: 0,
            is_active: true,
        }
    }

    /// Set the stock level.
    pub fn with_stock(mut self, stock_quantity: i64) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }

    /// Check if any units are available.
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Check if `quantity` units can be sold right now.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }

    /// Check if this product is on sale (compare-at price above price).
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .map(|cap| cap.currency == self.price.currency && cap.amount_minor > self.price.amount_minor)
            .unwrap_or(false)
    }

    /// Discount off the compare-at price, as a whole (truncated) percentage.
    ///
    /// Returns 0 when the product is not on sale.
    pub fn discount_percentage(&self) -> i64 {
        match self.compare_at_price {
            Some(cap) if self.is_on_sale() && cap.amount_minor > 0 => {
                let cap = i128::from(cap.amount_minor);
                let savings = cap - i128::from(self.price.amount_minor);
                // bounded: savings <= cap for a non-negative price
                i64::try_from(savings * 100 / cap).unwrap_or(i64::MAX)
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn tea() -> Product {
        Product::new("tea", "Ilam Tea", "ilam-tea", Money::new(2000, Currency::NPR))
    }

    #[test]
    fn test_product_creation() {
        let product = tea().with_stock(3);
        assert_eq!(product.id.as_str(), "tea");
        assert!(product.is_active);
        assert!(product.is_in_stock());
        assert!(product.can_fulfill(3));
        assert!(!product.can_fulfill(4));
    }

    #[test]
    fn test_out_of_stock() {
        assert!(!tea().is_in_stock());
    }

    #[test]
    fn test_product_on_sale() {
        let mut product = tea();
        product.compare_at_price = Some(Money::new(3000, Currency::NPR));

        assert!(product.is_on_sale());
        // 1000 / 3000 = 33.3%, truncated
        assert_eq!(product.discount_percentage(), 33);
    }

    #[test]
    fn test_discount_percentage_extreme_prices() {
        let mut product = tea();
        product.price = Money::new(-1, Currency::NPR);
        product.compare_at_price = Some(Money::new(0, Currency::NPR));
        assert_eq!(product.discount_percentage(), 0);

        product.price = Money::new(1, Currency::NPR);
        product.compare_at_price = Some(Money::new(i64::MAX, Currency::NPR));
        assert_eq!(product.discount_percentage(), 99);

        product.price = Money::new(-5, Currency::NPR);
        product.compare_at_price = Some(Money::new(i64::MAX, Currency::NPR));
        assert_eq!(product.discount_percentage(), 100);
    }

    #[test]
    fn test_not_on_sale() {
        let mut product = tea();
        assert_eq!(product.discount_percentage(), 0);

        product.compare_at_price = Some(Money::new(1500, Currency::NPR));
        assert!(!product.is_on_sale());
        assert_eq!(product.discount_percentage(), 0);
    }
}
