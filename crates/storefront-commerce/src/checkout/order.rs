//! Order types.
//!
//! An [`Order`] is built once at checkout and is immutable afterwards except
//! for its status workflow and payment placeholder fields. Monetary fields are
//! private so `total == subtotal + tax + shipping_cost` cannot be broken after
//! construction.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::checkout::{Address, Contact};
use crate::error::{CommerceError, Result};
use crate::ids::{OrderId, ProductId, UserId};
use crate::money::{Currency, Money};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Check whether the workflow allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (*self, next),
            (Pending, Processing)
                | (Processing, Shipped)
                | (Shipped, Delivered)
                | (Pending | Processing | Shipped, Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment placeholder fields. No gateway is integrated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    pub is_paid: bool,
    pub method: Option<String>,
    pub payment_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// A placed order.
///
/// Serialize-only: an order can only come into existence through
/// [`Order::new`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Order {
    id: OrderId,
    user_id: Option<UserId>,
    contact: Contact,
    shipping_address: Address,
    notes: Option<String>,
    currency: Currency,
    subtotal: Money,
    tax: Money,
    shipping_cost: Money,
    total: Money,
    status: OrderStatus,
    payment: Payment,
    lines: Vec<OrderLine>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    shipped_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Build a pending order from its lines.
    ///
    /// The subtotal is the sum of line totals; the total adds tax and
    /// shipping. Every amount must be in `currency`.
    pub fn new(
        user_id: Option<UserId>,
        contact: Contact,
        shipping_address: Address,
        notes: Option<String>,
        lines: Vec<OrderLine>,
        tax: Money,
        shipping_cost: Money,
    ) -> Result<Self> {
        let currency = tax.currency;
        let subtotal = Money::try_sum(lines.iter().map(|l| &l.line_total), currency)?;
        let total = subtotal.try_add(&tax)?.try_add(&shipping_cost)?;
        let now = Utc::now();

        Ok(Self {
            id: OrderId::generate(),
            user_id,
            contact,
            shipping_address,
            notes,
            currency,
            subtotal,
            tax,
            shipping_cost,
            total,
            status: OrderStatus::Pending,
            payment: Payment::default(),
            lines,
            created_at: now,
            updated_at: now,
            shipped_at: None,
            delivered_at: None,
        })
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn shipping_cost(&self) -> Money {
        self.shipping_cost
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn shipped_at(&self) -> Option<DateTime<Utc>> {
        self.shipped_at
    }

    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    /// Customer's full name.
    pub fn full_name(&self) -> String {
        self.contact.full_name()
    }

    /// Shipping address on one line.
    pub fn full_address(&self) -> String {
        self.shipping_address.one_line()
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |count, l| count.saturating_add(l.quantity))
    }

    /// Move the order along its status workflow.
    ///
    /// Entering `shipped` or `delivered` stamps the matching timestamp.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(CommerceError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }

        let now = Utc::now();
        match next {
            OrderStatus::Shipped => self.shipped_at = Some(now),
            OrderStatus::Delivered => self.delivered_at = Some(now),
            _ => {}
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Record a payment against the order.
    pub fn mark_paid(&mut self, method: impl Into<String>, payment_id: impl Into<String>) {
        let now = Utc::now();
        self.payment = Payment {
            is_paid: true,
            method: Some(method.into()),
            payment_id: Some(payment_id.into()),
            paid_at: Some(now),
        };
        self.updated_at = now;
    }
}

/// A line in an order: what was bought, at what price.
///
/// Product name and slug are copied so later catalog edits do not change
/// order history.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_slug: String,
    pub unit_price: Money,
    pub quantity: i64,
    line_total: Money,
}

impl OrderLine {
    /// Snapshot `product` bought at `unit_price`.
    pub fn new(product: &Product, unit_price: Money, quantity: i64) -> Result<Self> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        Ok(Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_slug: product.slug.clone(),
            unit_price,
            quantity,
            line_total: unit_price.try_multiply(quantity)?,
        })
    }

    /// `unit_price * quantity`.
    pub fn line_total(&self) -> Money {
        self.line_total
    }
}
