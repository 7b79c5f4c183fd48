//! Cart and cart line types.

use std::collections::btree_map::{self, BTreeMap};

use crate::catalog::{Catalog, Product};
use crate::error::{CommerceError, Result};
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A shopping cart owned by one session.
///
/// Lines are keyed by product, so a product appears at most once. Each line
/// remembers the unit price the product had when it was first added; totals
/// always use that snapshot, never the live catalog price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Currency every line is priced in.
    pub currency: Currency,
    lines: BTreeMap<ProductId, CartLine>,
    #[serde(skip)]
    dirty: bool,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            lines: BTreeMap::new(),
            dirty: false,
        }
    }

    /// Add `quantity` units of `product`.
    ///
    /// A product not yet in the cart gets a line priced at its current catalog
    /// price. The quantity then either replaces (`override_quantity`) or is
    /// added to the stored one. Stock is not checked here.
    pub fn add(&mut self, product: &Product, quantity: i64, override_quantity: bool) -> Result<()> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if product.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency,
                got: product.price.currency,
            });
        }

        let current = self.lines.get(&product.id).map_or(0, |l| l.quantity);
        let quantity = if override_quantity {
            quantity
        } else {
            current
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?
        };

        self.lines
            .entry(product.id.clone())
            .or_insert_with(|| CartLine {
                product_id: product.id.clone(),
                quantity: 0,
                unit_price: product.price,
            })
            .quantity = quantity;

        self.dirty = true;
        Ok(())
    }

    /// Set a line's quantity. Zero or negative removes the line.
    ///
    /// Returns `false` when the product is not in the cart, which is a no-op.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(product_id);
        }

        match self.lines.get_mut(product_id) {
            Some(line) => {
                line.quantity = quantity;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Remove a product's line. Removing an absent product is a no-op.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let removed = self.lines.remove(product_id).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Discard every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.dirty = true;
    }

    /// Iterate lines joined against the live catalog.
    ///
    /// Lines whose product has disappeared from the catalog are skipped but
    /// stay in the cart. Each call starts a fresh pass.
    pub fn items<'a, C>(&'a self, catalog: &'a C) -> CartItems<'a, C>
    where
        C: Catalog + ?Sized,
    {
        CartItems {
            lines: self.lines.values(),
            catalog,
        }
    }

    /// Sum of `unit_price * quantity` over all stored lines.
    ///
    /// Lines for vanished products still count.
    pub fn total_price(&self) -> Result<Money> {
        self.lines
            .values()
            .try_fold(Money::zero(self.currency), |total, line| {
                total.try_add(&line.line_total()?)
            })
    }

    /// Sum of stored quantities, saturating at `i64::MAX`.
    pub fn item_count(&self) -> i64 {
        self.lines
            .values()
            .fold(0i64, |count, l| count.saturating_add(l.quantity))
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the stored line for a product.
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.get(product_id)
    }

    /// Stored lines, in product id order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Whether the cart changed since it was last persisted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the cart as persisted.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

/// One product's quantity and price snapshot within a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    /// Product in the cart.
    pub product_id: ProductId,
    /// Quantity. Always positive once stored.
    pub quantity: i64,
    /// Price captured when the product was first added.
    pub unit_price: Money,
}

impl CartLine {
    /// `unit_price * quantity`.
    pub fn line_total(&self) -> Result<Money> {
        self.unit_price.try_multiply(self.quantity)
    }
}

/// A cart line joined with its live catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    /// Current catalog data for the product.
    pub product: Product,
    /// Price snapshot from the cart line.
    pub unit_price: Money,
    /// Quantity in the cart.
    pub quantity: i64,
    /// `unit_price * quantity`.
    pub line_total: Money,
}

/// Iterator returned by [`Cart::items`].
pub struct CartItems<'a, C: ?Sized> {
    lines: btree_map::Values<'a, ProductId, CartLine>,
    catalog: &'a C,
}

impl<C> Iterator for CartItems<'_, C>
where
    C: Catalog + ?Sized,
{
    type Item = Result<CartItem>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            let product = match self.catalog.product(&line.product_id) {
                Ok(Some(product)) => product,
                Ok(None) => {
                    tracing::debug!(product_id = %line.product_id, "skipping cart line for missing product");
                    continue;
                }
                Err(e) => return Some(Err(e)),
            };

            return Some(line.line_total().map(|line_total| CartItem {
                product,
                unit_price: line.unit_price,
                quantity: line.quantity,
                line_total,
            }));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FixedCatalog(HashMap<ProductId, Product>);

    impl Catalog for FixedCatalog {
        fn product(&self, id: &ProductId) -> Result<Option<Product>> {
            Ok(self.0.get(id).cloned())
        }
    }

    fn product(id: &str, price: i64) -> Product {
        Product::new(id, id.to_uppercase(), id, Money::new(price, Currency::NPR)).with_stock(10)
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::default();
        assert!(cart.is_empty());
        assert!(!cart.is_dirty());
        assert_eq!(cart.currency, Currency::NPR);
        assert!(cart.total_price().unwrap().is_zero());
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::default();
        cart.add(&product("a", 500), 2, false).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.len(), 1);
        assert!(cart.is_dirty());
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::default();
        let a = product("a", 500);

        cart.add(&a, 1, false).unwrap();
        cart.add(&a, 2, false).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_with_override() {
        let mut cart = Cart::default();
        let a = product("a", 500);

        cart.add(&a, 4, false).unwrap();
        cart.add(&a, 1, true).unwrap();

        assert_eq!(cart.line(&a.id).unwrap().quantity, 1);
    }

    #[test]
    fn test_add_invalid_quantity() {
        let mut cart = Cart::default();
        let result = cart.add(&product("a", 500), 0, false);

        assert!(matches!(result, Err(CommerceError::InvalidQuantity(0))));
        assert!(cart.is_empty());
        assert!(!cart.is_dirty());
    }

    #[test]
    fn test_add_overflow_leaves_line_intact() {
        let mut cart = Cart::default();
        let a = product("a", 1);

        cart.add(&a, i64::MAX, false).unwrap();
        assert!(matches!(cart.add(&a, 1, false), Err(CommerceError::Overflow)));
        assert_eq!(cart.line(&a.id).unwrap().quantity, i64::MAX);
    }

    #[test]
    fn test_item_count_saturates() {
        let mut cart = Cart::default();
        cart.add(&product("a", 1), i64::MAX, false).unwrap();
        cart.add(&product("b", 1), 1, false).unwrap();

        assert_eq!(cart.item_count(), i64::MAX);
        assert!(matches!(cart.total_price(), Err(CommerceError::Overflow)));
    }

    #[test]
    fn test_add_currency_mismatch() {
        let mut cart = Cart::new(Currency::USD);
        let result = cart.add(&product("a", 500), 1, false);
        assert!(matches!(result, Err(CommerceError::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::default();
        let a = product("a", 500);
        cart.add(&a, 1, false).unwrap();

        assert!(cart.update_quantity(&a.id, 5));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let mut cart = Cart::default();
        let a = product("a", 500);
        cart.add(&a, 3, false).unwrap();

        assert!(cart.update_quantity(&a.id, 0));
        assert!(cart.line(&a.id).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_absent_is_noop() {
        let mut cart = Cart::default();
        assert!(!cart.update_quantity(&ProductId::new("ghost"), 3));
        assert!(cart.is_empty());
        assert!(!cart.is_dirty());
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut cart = Cart::default();
        let a = product("a", 500);
        cart.add(&a, 1, false).unwrap();

        assert!(cart.remove(&a.id));
        assert!(!cart.remove(&a.id));
        assert!(!cart.remove(&a.id));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::default();
        cart.add(&product("a", 500), 1, false).unwrap();
        cart.add(&product("b", 700), 1, false).unwrap();
        cart.mark_clean();

        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.is_dirty());
    }

    #[test]
    fn test_price_snapshot_is_kept() {
        let mut cart = Cart::default();
        let mut a = product("a", 100);
        cart.add(&a, 1, false).unwrap();

        // catalog price changes after the add
        a.price = Money::new(150, Currency::NPR);
        cart.add(&a, 1, false).unwrap();

        assert_eq!(cart.line(&a.id).unwrap().unit_price.amount_minor, 100);
        assert_eq!(cart.total_price().unwrap().amount_minor, 200);
    }

    #[test]
    fn test_items_skip_missing_products() {
        let a = product("a", 500);
        let b = product("b", 1000);
        let mut cart = Cart::default();
        cart.add(&a, 2, false).unwrap();
        cart.add(&b, 1, false).unwrap();

        let catalog = FixedCatalog(HashMap::from([(a.id.clone(), a.clone())]));
        let items: Vec<CartItem> = cart.items(&catalog).collect::<Result<_>>().unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.id, a.id);
        assert_eq!(items[0].line_total.amount_minor, 1000);

        // raw totals still include the vanished line
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total_price().unwrap().amount_minor, 2000);
    }

    #[test]
    fn test_items_are_restartable() {
        let a = product("a", 500);
        let mut cart = Cart::default();
        cart.add(&a, 2, false).unwrap();
        let catalog = FixedCatalog(HashMap::from([(a.id.clone(), a.clone())]));

        assert_eq!(cart.items(&catalog).count(), 1);
        assert_eq!(cart.items(&catalog).count(), 1);
    }

    #[test]
    fn test_items_use_snapshot_price_with_live_product() {
        let mut a = product("a", 100);
        let mut cart = Cart::default();
        cart.add(&a, 3, false).unwrap();

        a.price = Money::new(150, Currency::NPR);
        a.name = "Renamed".to_string();
        let catalog = FixedCatalog(HashMap::from([(a.id.clone(), a.clone())]));

        let item = cart.items(&catalog).next().unwrap().unwrap();
        assert_eq!(item.product.name, "Renamed");
        assert_eq!(item.unit_price.amount_minor, 100);
        assert_eq!(item.line_total.amount_minor, 300);
    }

    #[test]
    fn test_serialization_round_trip_drops_dirty_flag() {
        let mut cart = Cart::default();
        cart.add(&product("a", 500), 2, false).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.line(&ProductId::new("a")), cart.line(&ProductId::new("a")));
        assert!(!restored.is_dirty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(i64),
            Update(i64),
            Remove,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (1i64..=5).prop_map(Op::Add),
                (-3i64..=10).prop_map(Op::Update),
                Just(Op::Remove),
            ]
        }

        proptest! {
            /// Property: stored quantity is the net of adds and updates, and a
            /// line disappears once it is set to zero or below.
            #[test]
            fn stored_quantity_tracks_operations(ops in prop::collection::vec(op(), 0..40)) {
                let a = product("a", 250);
                let mut cart = Cart::default();
                let mut expected: Option<i64> = None;

                for op in ops {
                    match op {
                        Op::Add(q) => {
                            cart.add(&a, q, false).unwrap();
                            expected = Some(expected.unwrap_or(0) + q);
                        }
                        Op::Update(q) => {
                            cart.update_quantity(&a.id, q);
                            expected = if q <= 0 { None } else { expected.map(|_| q) };
                        }
                        Op::Remove => {
                            cart.remove(&a.id);
                            expected = None;
                        }
                    }

                    prop_assert_eq!(cart.line(&a.id).map(|l| l.quantity), expected);
                    prop_assert_eq!(cart.item_count(), expected.unwrap_or(0));
                    prop_assert_eq!(
                        cart.total_price().unwrap().amount_minor,
                        250 * expected.unwrap_or(0)
                    );
                }
            }
        }
    }
}
