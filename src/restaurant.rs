//! Restaurant: order registry and pipeline wiring
//!
//! The restaurant owns every order for its whole life, issues order IDs,
//! starts the kitchen and delivery stage, and answers status and statistics
//! queries without blocking the pipeline.

use crate::clock::SimClock;
use crate::config::{SimulationConfig, SimulationMode};
use crate::delivery::{DeliveryStage, DEFAULT_DELIVERY_WINDOW};
use crate::error::Result;
use crate::kitchen::Kitchen;
use crate::menu::MenuItem;
use crate::order::{Order, OrderEntry, OrderStatus};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tokio::sync::watch;
use tracing::info;

/// Snapshot of restaurant activity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantStats {
    pub total_orders: u64,
    pub kitchen_load: usize,
    pub kitchen_capacity: usize,
    pub chefs: usize,
    pub orders_by_status: BTreeMap<OrderStatus, usize>,
}

impl RestaurantStats {
    /// Orders currently in `status`
    pub fn count(&self, status: OrderStatus) -> usize {
        self.orders_by_status.get(&status).copied().unwrap_or(0)
    }
}

impl fmt::Display for RestaurantStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total_orders={} kitchen_load={}/{} chefs={}",
            self.total_orders, self.kitchen_load, self.kitchen_capacity, self.chefs
        )?;
        for (status, count) in &self.orders_by_status {
            write!(f, " {}={}", status, count)?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Registry {
    orders: HashMap<u64, Arc<OrderEntry>>,
    order_count: u64,
}

/// A running restaurant
pub struct Restaurant {
    name: String,
    id: u32,
    clock: SimClock,
    kitchen: Kitchen,
    registry: RwLock<Registry>,
    delivered_rx: watch::Receiver<u64>,
}

impl Restaurant {
    /// Open a restaurant with the default delivery window
    ///
    /// Must be called from within a tokio runtime: the kitchen's dispatch
    /// loop and the delivery loop start immediately.
    pub fn new(
        name: impl Into<String>,
        id: u32,
        mode: SimulationMode,
        chefs: usize,
        kitchen_capacity: usize,
    ) -> Result<Self> {
        let clock = SimClock::new(mode);
        let delivery = DeliveryStage::new(id, clock.clone(), DEFAULT_DELIVERY_WINDOW, None);
        Self::open(name.into(), id, clock, chefs, kitchen_capacity, delivery)
    }

    /// Open a restaurant from a validated configuration
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let clock = SimClock::new(config.mode);
        let delivery = DeliveryStage::new(
            config.restaurant,
            clock.clone(),
            config.delivery_min_secs..=config.delivery_max_secs,
            config.seed,
        );
        Self::open(
            config.display_name(),
            config.restaurant,
            clock,
            config.chefs,
            config.capacity,
            delivery,
        )
    }

    fn open(
        name: String,
        id: u32,
        clock: SimClock,
        chefs: usize,
        kitchen_capacity: usize,
        (delivery, delivered_rx): (DeliveryStage, watch::Receiver<u64>),
    ) -> Result<Self> {
        let (kitchen, ready_rx, _dispatch) =
            Kitchen::start(id, clock.clone(), chefs, kitchen_capacity)?;
        delivery.spawn(ready_rx);

        info!("[Restaurant #{}] Restaurant simulation started!", id);
        info!("[Restaurant #{}] Restaurant: {}", id, name);
        info!(
            "[Restaurant #{}] Kitchen: {} chefs, capacity: {} orders ({} mode)",
            id,
            chefs,
            kitchen_capacity,
            clock.mode()
        );

        Ok(Self {
            name,
            id,
            clock,
            kitchen,
            registry: RwLock::new(Registry::default()),
            delivered_rx,
        })
    }

    /// Register a new order and queue it for the kitchen
    ///
    /// Returns as soon as the order is admitted; preparation happens in the
    /// background.
    pub fn create_order(&self, customer_name: &str, items: Vec<MenuItem>) -> Result<Order> {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);

        let id = registry.order_count + 1;
        let entry = Arc::new(OrderEntry::new(id, customer_name, items));
        // Submitting under the registry lock keeps admission order equal to ID order.
        self.kitchen.submit(entry.clone())?;
        registry.order_count = id;
        registry.orders.insert(id, entry.clone());
        drop(registry);

        let order = entry.snapshot();
        info!(
            "[Restaurant #{}] Order #{} created for {} - Total: ${:.2}",
            self.id, order.id, order.customer_name, order.total_amount
        );
        Ok(order)
    }

    /// Current state of an order, if it exists
    pub fn get_order_status(&self, order_id: u64) -> Option<Order> {
        self.registry()
            .orders
            .get(&order_id)
            .map(|entry| entry.snapshot())
    }

    /// Activity snapshot; scans every order
    pub fn stats(&self) -> RestaurantStats {
        let registry = self.registry();
        let mut orders_by_status = BTreeMap::new();
        for entry in registry.orders.values() {
            *orders_by_status.entry(entry.status()).or_insert(0) += 1;
        }

        RestaurantStats {
            total_orders: registry.order_count,
            kitchen_load: self.kitchen.current_load(),
            kitchen_capacity: self.kitchen.max_capacity(),
            chefs: self.kitchen.chefs(),
            orders_by_status,
        }
    }

    /// Every order, sorted by ID
    pub fn orders(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .registry()
            .orders
            .values()
            .map(|entry| entry.snapshot())
            .collect();
        orders.sort_by_key(|order| order.id);
        orders
    }

    /// Wait until every order created so far has been delivered
    pub async fn wait_until_drained(&self) {
        let target = self.registry().order_count;
        let mut delivered = self.delivered_rx.clone();
        // The sender lives as long as the delivery stage; if it is gone
        // nothing more can be delivered.
        let _ = delivered.wait_for(|count| *count >= target).await;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn mode(&self) -> SimulationMode {
        self.clock.mode()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn kitchen(&self) -> &Kitchen {
        &self.kitchen
    }

    fn registry(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }
}
