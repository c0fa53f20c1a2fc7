//! Orders and their status lifecycle.
//!
//! Line items carry name and unit price snapshots taken when the order is
//! placed, so later catalog edits never change a historical order. The total
//! is always recomputed from the lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::MAX_LINE_QUANTITY;
use crate::error::{DomainError, DomainResult};
use crate::resource::Resource;

/// Order lifecycle.
///
/// `placed → processing → shipped → delivered`, with `cancelled` reachable
/// from any state that is not terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Placed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (current, Cancelled) => !current.is_terminal(),
            (Placed, Processing) | (Processing, Shipped) | (Shipped, Delivered) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Postal address snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub full_name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Address line is required"))]
    pub line1: String,
    pub line2: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    pub state: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Postal code is required"))]
    pub postal_code: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    pub phone: Option<String>,
}

/// Priced order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product: Uuid,
    /// Product size variant the price was taken from, if any
    pub variant: Option<Uuid>,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl LineItem {
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Ordering user's id
    pub user: Uuid,
    pub items: Vec<LineItem>,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub total: f64,
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a new order in `placed` state from already-priced lines.
    pub fn place(
        id: Uuid,
        user: Uuid,
        input: NewOrder,
        items: Vec<LineItem>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation("Order must contain at least one item"));
        }
        let total = total_of(&items)?;
        Ok(Self {
            id,
            user,
            items,
            shipping_address: input.shipping_address,
            billing_address: input.billing_address,
            total,
            notes: input.notes,
            status: OrderStatus::Placed,
            created_at: now,
            updated_at: now,
        })
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn transition(&mut self, next: OrderStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition(self.status, next));
        }
        self.status = next;
        self.touch(now);
        Ok(())
    }
}

/// Sum of line subtotals rounded to cents. Fails when the sum is not a
/// finite amount.
fn total_of(items: &[LineItem]) -> DomainResult<f64> {
    let total: f64 = items.iter().map(LineItem::subtotal).sum();
    let total = (total * 100.0).round() / 100.0;
    if !total.is_finite() {
        return Err(DomainError::validation("Order total is out of range"));
    }
    Ok(total)
}

impl Resource for Order {
    const COLLECTION: &'static str = "orders";
    const LABEL: &'static str = "Order";
    const SEARCH_FIELDS: &'static [&'static str] = &["notes"];
    const PRICE_FIELD: Option<&'static str> = Some("total");

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn check(&self) -> DomainResult<()> {
        if self.items.is_empty() {
            return Err(DomainError::validation("Order must contain at least one item"));
        }
        if self.items.iter().any(|i| i.quantity == 0) {
            return Err(DomainError::validation("Quantity must be at least 1"));
        }
        let expected = total_of(&self.items)?;
        if !self.total.is_finite() || (self.total - expected).abs() > f64::EPSILON {
            return Err(DomainError::validation("Order total does not match its items"));
        }
        Ok(())
    }
}

/// Requested order line, priced server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub product: Uuid,
    pub variant: Option<Uuid>,
    #[validate(range(
        min = 1,
        max = MAX_LINE_QUANTITY,
        message = "Quantity must be between 1 and 10000"
    ))]
    pub quantity: u32,
}

/// Order creation input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default)]
    #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
    pub items: Vec<LineRequest>,
    #[serde(default)]
    #[validate(nested)]
    pub shipping_address: Address,
    #[validate(nested)]
    pub billing_address: Option<Address>,
    pub notes: Option<String>,
}

/// Status change input
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OrderStatusChange {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            line1: "1 Main St".into(),
            city: "Springfield".into(),
            postal_code: "12345".into(),
            country: "US".into(),
            ..Default::default()
        }
    }

    fn line(quantity: u32, unit_price: f64) -> LineItem {
        LineItem {
            product: Uuid::new_v4(),
            variant: None,
            name: "Apple Juice".into(),
            quantity,
            unit_price,
        }
    }

    fn placed() -> Order {
        let input = NewOrder {
            shipping_address: address(),
            ..Default::default()
        };
        Order::place(
            Uuid::new_v4(),
            Uuid::new_v4(),
            input,
            vec![line(2, 1.25), line(1, 3.1)],
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let order = placed();
        assert_eq!(order.total, 5.6);
        assert!(order.check().is_ok());
    }

    #[test]
    fn test_place_rejects_total_beyond_f64_range() {
        let result = Order::place(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NewOrder::default(),
            vec![line(2, 1e308)],
            Utc::now(),
        );
        assert!(matches!(result, Err(DomainError::Validation(msg)) if msg == "Order total is out of range"));
    }

    #[test]
    fn test_check_rejects_infinite_total() {
        let mut order = placed();
        order.items = vec![line(2, 1e308)];
        order.total = f64::INFINITY;
        assert!(order.check().is_err());

        let mut order = placed();
        order.total = f64::NAN;
        assert!(order.check().is_err());
    }

    #[test]
    fn test_place_rejects_empty_order() {
        let result = Order::place(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NewOrder::default(),
            vec![],
            Utc::now(),
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_lifecycle_happy_path() {
        let mut order = placed();
        let now = Utc::now();
        for next in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            order.transition(next, now).unwrap();
        }
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_cancel_only_from_non_terminal() {
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_skipping_states_is_rejected() {
        let mut order = placed();
        let err = order
            .transition(OrderStatus::Delivered, Utc::now())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot change status from placed to delivered"
        );
        assert_eq!(order.status, OrderStatus::Placed);
    }

    #[test]
    fn test_new_order_validation() {
        let input: NewOrder = serde_json::from_str(
            r#"{"items": [{"product": "6f1c2b1e-8a9b-4c2d-9e3f-0a1b2c3d4e5f", "quantity": 0}],
                "shippingAddress": {"line1": "x", "city": "y", "postalCode": "z", "country": "US"}}"#,
        )
        .unwrap();
        assert!(input.validate().is_err());
    }
}
