//! Orders and their lifecycle
//!
//! An [`OrderEntry`] is the single shared record of an order. The
//! restaurant's registry owns it; the kitchen and the delivery stage hold an
//! `Arc` to it only while the order passes through their queue. Readers take
//! an [`Order`] snapshot instead of touching the entry.

use crate::error::{Result, SimError};
use crate::menu::MenuItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// Lifecycle status of an order
///
/// Statuses are ordered by lifecycle position. `Cancelled` is reserved:
/// nothing in the pipeline produces it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Received,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status an order passes through, in order
    pub const LIFECYCLE: [OrderStatus; 4] = [
        OrderStatus::Received,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
    ];

    /// The only status this one may move to
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            Self::Received => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status an order entered and when
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub at: DateTime<Utc>,
}

/// Point-in-time copy of an order
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: u64,
    pub customer_name: String,
    pub items: Vec<MenuItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub ready_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    /// Simulated preparation time assigned by the kitchen
    #[serde(with = "humantime_serde")]
    pub prep_duration: Option<Duration>,
    /// Simulated delivery time assigned by the delivery stage
    #[serde(with = "humantime_serde")]
    pub delivery_duration: Option<Duration>,
    pub history: Vec<StatusChange>,
}

impl Order {
    /// Wall-clock time from creation to the latest milestone reached
    pub fn total_time(&self) -> chrono::Duration {
        let end = self
            .delivered_at
            .or(self.ready_at)
            .unwrap_or_else(Utc::now);
        end - self.created_at
    }

    /// Statuses entered so far, oldest first
    pub fn statuses(&self) -> Vec<OrderStatus> {
        self.history.iter().map(|change| change.status).collect()
    }
}

#[derive(Debug)]
struct Lifecycle {
    status: OrderStatus,
    ready_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
    prep_duration: Option<Duration>,
    delivery_duration: Option<Duration>,
    history: Vec<StatusChange>,
}

/// Shared record of one order
#[derive(Debug)]
pub struct OrderEntry {
    id: u64,
    customer_name: String,
    items: Vec<MenuItem>,
    total_amount: f64,
    created_at: DateTime<Utc>,
    lifecycle: RwLock<Lifecycle>,
}

impl OrderEntry {
    /// Create an order in the `Received` status
    pub fn new(id: u64, customer_name: impl Into<String>, items: Vec<MenuItem>) -> Self {
        let created_at = Utc::now();
        Self {
            id,
            customer_name: customer_name.into(),
            total_amount: calculate_total(&items),
            items,
            created_at,
            lifecycle: RwLock::new(Lifecycle {
                status: OrderStatus::Received,
                ready_at: None,
                delivered_at: None,
                prep_duration: None,
                delivery_duration: None,
                history: vec![StatusChange {
                    status: OrderStatus::Received,
                    at: created_at,
                }],
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn status(&self) -> OrderStatus {
        self.read().status
    }

    /// Sum of the preparation time of every line item
    pub fn raw_prep_time(&self) -> Duration {
        self.items.iter().map(|item| item.prep_time).sum()
    }

    /// Move to the next lifecycle status
    ///
    /// Only the direct successor of the current status is accepted, which
    /// keeps transitions monotonic with no skipped stage.
    pub fn advance(&self, to: OrderStatus) -> Result<()> {
        let mut lifecycle = self.write();
        if lifecycle.status.next() != Some(to) {
            return Err(SimError::invalid_transition(self.id, lifecycle.status, to));
        }

        let now = Utc::now();
        match to {
            OrderStatus::Ready => lifecycle.ready_at = Some(now),
            OrderStatus::Delivered => lifecycle.delivered_at = Some(now),
            _ => {}
        }
        lifecycle.status = to;
        lifecycle.history.push(StatusChange { status: to, at: now });
        Ok(())
    }

    pub(crate) fn set_prep_duration(&self, duration: Duration) {
        self.write().prep_duration = Some(duration);
    }

    pub(crate) fn set_delivery_duration(&self, duration: Duration) {
        self.write().delivery_duration = Some(duration);
    }

    pub fn snapshot(&self) -> Order {
        let lifecycle = self.read();
        Order {
            id: self.id,
            customer_name: self.customer_name.clone(),
            items: self.items.clone(),
            total_amount: self.total_amount,
            status: lifecycle.status,
            created_at: self.created_at,
            ready_at: lifecycle.ready_at,
            delivered_at: lifecycle.delivered_at,
            prep_duration: lifecycle.prep_duration,
            delivery_duration: lifecycle.delivery_duration,
            history: lifecycle.history.clone(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Lifecycle> {
        self.lifecycle.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Lifecycle> {
        self.lifecycle.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Total price of a list of items
pub fn calculate_total(items: &[MenuItem]) -> f64 {
    items.iter().map(|item| item.price).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::menu::default_menu;

    fn sample_entry() -> OrderEntry {
        let items = default_menu().resolve(&["burger", "fries"]).unwrap();
        OrderEntry::new(1, "Alice Johnson", items)
    }

    #[test]
    fn test_new_order_is_received() {
        let entry = sample_entry();
        let order = entry.snapshot();

        assert_eq!(order.status, OrderStatus::Received);
        assert!((order.total_amount - 17.98).abs() < 1e-9);
        assert!(order.ready_at.is_none());
        assert!(order.delivered_at.is_none());
        assert_eq!(order.statuses(), vec![OrderStatus::Received]);
        assert_eq!(entry.raw_prep_time(), Duration::from_secs(12 * 60));
    }

    #[test]
    fn test_full_lifecycle_sets_timestamps() {
        let entry = sample_entry();
        entry.advance(OrderStatus::Preparing).unwrap();
        entry.advance(OrderStatus::Ready).unwrap();
        assert!(entry.snapshot().ready_at.is_some());
        entry.advance(OrderStatus::Delivered).unwrap();

        let order = entry.snapshot();
        assert_eq!(order.statuses(), OrderStatus::LIFECYCLE.to_vec());
        assert!(order.delivered_at.unwrap() >= order.ready_at.unwrap());
        assert!(order.total_time() >= chrono::Duration::zero());
    }

    #[test]
    fn test_advance_rejects_skips_and_regressions() {
        let entry = sample_entry();

        let err = entry.advance(OrderStatus::Ready).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ORDER_INVALID_TRANSITION);

        entry.advance(OrderStatus::Preparing).unwrap();
        assert!(entry.advance(OrderStatus::Preparing).is_err());
        assert!(entry.advance(OrderStatus::Received).is_err());
        assert!(entry.advance(OrderStatus::Cancelled).is_err());
        assert_eq!(entry.status(), OrderStatus::Preparing);
    }

    #[test]
    fn test_status_ordering_follows_lifecycle() {
        assert!(OrderStatus::Received < OrderStatus::Preparing);
        assert!(OrderStatus::Ready < OrderStatus::Delivered);
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert_eq!(OrderStatus::Delivered.to_string(), "delivered");
    }

    #[test]
    fn test_snapshot_serializes_lowercase_status() {
        let entry = sample_entry();
        entry.set_prep_duration(Duration::from_secs(240));
        let json = serde_json::to_value(entry.snapshot()).unwrap();

        assert_eq!(json["status"], "received");
        assert_eq!(json["prep_duration"], "4m");
        assert!(json["delivery_duration"].is_null());
    }
}
