//! Delivery stage
//!
//! Consumes the kitchen's ready queue in FIFO order. Each order gets a
//! delivery time drawn uniformly from the configured window and is then
//! delivered by its own task, so one slow delivery never holds up the next.

use crate::clock::SimClock;
use crate::kitchen::ReadyQueue;
use crate::order::{OrderEntry, OrderStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Default delivery window in seconds
pub const DEFAULT_DELIVERY_WINDOW: RangeInclusive<u64> = 1..=5;

pub struct DeliveryStage {
    restaurant_id: u32,
    clock: SimClock,
    window_secs: RangeInclusive<u64>,
    rng: Mutex<StdRng>,
    delivered: watch::Sender<u64>,
}

impl DeliveryStage {
    /// Create a delivery stage
    ///
    /// The returned receiver tracks how many orders have been delivered.
    pub fn new(
        restaurant_id: u32,
        clock: SimClock,
        window_secs: RangeInclusive<u64>,
        seed: Option<u64>,
    ) -> (Self, watch::Receiver<u64>) {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let (delivered, delivered_rx) = watch::channel(0);

        (
            Self {
                restaurant_id,
                clock,
                window_secs,
                rng: Mutex::new(rng),
                delivered,
            },
            delivered_rx,
        )
    }

    /// Draw the next delivery time from the window
    pub fn delivery_time(&self) -> Duration {
        if self.window_secs.is_empty() {
            return Duration::from_secs(*self.window_secs.start());
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Duration::from_secs(rng.random_range(self.window_secs.clone()))
    }

    /// Run the delivery loop until the ready queue closes
    pub fn spawn(self, ready_rx: ReadyQueue) -> JoinHandle<()> {
        tokio::spawn(Arc::new(self).run(ready_rx))
    }

    async fn run(self: Arc<Self>, mut ready_rx: ReadyQueue) {
        debug!("[Restaurant #{}] Delivery service started", self.restaurant_id);

        while let Some(order) = ready_rx.recv().await {
            let delivery_time = self.delivery_time();
            let stage = self.clone();
            tokio::spawn(async move { stage.deliver(order, delivery_time).await });
        }

        debug!(
            "[Restaurant #{}] Ready queue closed, delivery loop exiting",
            self.restaurant_id
        );
    }

    async fn deliver(&self, order: Arc<OrderEntry>, delivery_time: Duration) {
        order.set_delivery_duration(delivery_time);
        self.clock
            .wait(
                delivery_time,
                &format!(
                    "Delivering order #{} to {}",
                    order.id(),
                    order.customer_name()
                ),
            )
            .await;

        if let Err(e) = order.advance(OrderStatus::Delivered) {
            error!("[Restaurant #{}] {}", self.restaurant_id, e);
            return;
        }
        info!(
            "[Restaurant #{}] Delivery: Order #{} delivered to {} (delivery time: {:?})",
            self.restaurant_id,
            order.id(),
            order.customer_name(),
            delivery_time
        );
        self.delivered.send_modify(|count| *count += 1);
    }
}
