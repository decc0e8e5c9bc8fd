//! Kitchen: admission control and parallel preparation
//!
//! Orders enter through an unbounded admission queue. A single dispatch
//! loop pops them in arrival order, waits for a free preparation slot and
//! hands each order to its own preparation task. The loop never waits for
//! preparation to finish, so orders begin in FIFO order but may complete in
//! any order. Finished orders are pushed onto the ready queue for delivery.

pub mod slots;

pub use slots::{PreparationSlot, SlotGauge, SlotPool};

use crate::clock::SimClock;
use crate::error::{ErrorCode, Result, SimError};
use crate::order::{OrderEntry, OrderStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Shortest preparation the kitchen will simulate
pub const MIN_PREP_TIME: Duration = Duration::from_secs(1);

/// Orders that finished preparation, in completion order
pub type ReadyQueue = mpsc::UnboundedReceiver<Arc<OrderEntry>>;

/// Preparation time for an order once its work is split across the chefs
///
/// The raw time is divided evenly between chefs and floored at
/// [`MIN_PREP_TIME`].
pub fn preparation_time(raw: Duration, chefs: usize) -> Duration {
    let chefs = u32::try_from(chefs.max(1)).unwrap_or(u32::MAX);
    (raw / chefs).max(MIN_PREP_TIME)
}

struct KitchenInner {
    restaurant_id: u32,
    chefs: usize,
    clock: SimClock,
    slots: SlotPool,
}

/// Handle to a running kitchen
///
/// Cloning is cheap. The dispatch loop runs until every handle is dropped
/// and the admission queue has been drained.
#[derive(Clone)]
pub struct Kitchen {
    inner: Arc<KitchenInner>,
    admission_tx: mpsc::UnboundedSender<Arc<OrderEntry>>,
}

impl Kitchen {
    /// Start a kitchen and its dispatch loop on the current tokio runtime
    ///
    /// Returns the kitchen handle, the ready queue the delivery stage should
    /// consume, and the dispatch loop's join handle.
    pub fn start(
        restaurant_id: u32,
        clock: SimClock,
        chefs: usize,
        max_capacity: usize,
    ) -> Result<(Self, ReadyQueue, JoinHandle<()>)> {
        if chefs == 0 {
            return Err(SimError::config_with_code(
                ErrorCode::CONFIG_INVALID_CHEFS,
                "at least one chef is required",
            ));
        }
        if max_capacity == 0 {
            return Err(SimError::config_with_code(
                ErrorCode::CONFIG_INVALID_CAPACITY,
                "kitchen capacity must be at least 1",
            ));
        }
        let runtime = Handle::try_current().map_err(SimError::no_runtime)?;

        let (admission_tx, admission_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = mpsc::unbounded_channel();

        let inner = Arc::new(KitchenInner {
            restaurant_id,
            chefs,
            clock,
            slots: SlotPool::new(max_capacity),
        });

        let dispatch = runtime.spawn(dispatch_loop(inner.clone(), admission_rx, ready_tx));

        Ok((
            Self {
                inner,
                admission_tx,
            },
            ready_rx,
            dispatch,
        ))
    }

    /// Queue an order for preparation without waiting
    pub fn submit(&self, order: Arc<OrderEntry>) -> Result<()> {
        let order_id = order.id();
        self.admission_tx
            .send(order)
            .map_err(|_| SimError::kitchen_closed(self.inner.restaurant_id))?;
        debug!(
            "[Restaurant #{}] Order #{} queued for the kitchen",
            self.inner.restaurant_id, order_id
        );
        Ok(())
    }

    pub fn chefs(&self) -> usize {
        self.inner.chefs
    }

    pub fn max_capacity(&self) -> usize {
        self.inner.slots.capacity()
    }

    /// Orders currently holding a preparation slot
    pub fn current_load(&self) -> usize {
        self.inner.slots.load()
    }

    /// Highest load the kitchen has reached so far
    pub fn peak_load(&self) -> usize {
        self.inner.slots.peak()
    }
}

async fn dispatch_loop(
    kitchen: Arc<KitchenInner>,
    mut admission_rx: mpsc::UnboundedReceiver<Arc<OrderEntry>>,
    ready_tx: mpsc::UnboundedSender<Arc<OrderEntry>>,
) {
    info!(
        "[Restaurant #{}] Kitchen open: {} chefs, capacity {} orders",
        kitchen.restaurant_id,
        kitchen.chefs,
        kitchen.slots.capacity()
    );

    while let Some(order) = admission_rx.recv().await {
        let slot = match kitchen.slots.try_acquire() {
            Some(slot) => slot,
            None => {
                info!(
                    "[Restaurant #{}] Kitchen at capacity, order #{} waiting...",
                    kitchen.restaurant_id,
                    order.id()
                );
                match kitchen.slots.acquire().await {
                    Some(slot) => slot,
                    None => {
                        reject_remaining(&kitchen, order, &mut admission_rx).await;
                        break;
                    }
                }
            }
        };

        debug!(
            "[Restaurant #{}] Order #{} admitted (load {}/{})",
            kitchen.restaurant_id,
            order.id(),
            kitchen.slots.load(),
            kitchen.slots.capacity()
        );

        tokio::spawn(prepare_order(
            kitchen.clone(),
            order,
            slot,
            ready_tx.clone(),
        ));
    }

    debug!(
        "[Restaurant #{}] Admission queue closed, dispatch loop exiting",
        kitchen.restaurant_id
    );
}

/// Stop admissions once preparation slots are gone
///
/// New submissions fail with `KitchenClosed`. Every order already queued is
/// reported, and dropping the ready queue afterwards lets the delivery stage
/// finish so nothing waits on orders that can never be prepared.
async fn reject_remaining(
    kitchen: &KitchenInner,
    first: Arc<OrderEntry>,
    admission_rx: &mut mpsc::UnboundedReceiver<Arc<OrderEntry>>,
) {
    admission_rx.close();
    let mut stranded = vec![first.id()];
    while let Some(order) = admission_rx.recv().await {
        stranded.push(order.id());
    }
    error!(
        "[Restaurant #{}] Preparation slots closed, {} order(s) will not be prepared: {:?}",
        kitchen.restaurant_id,
        stranded.len(),
        stranded
    );
}

async fn prepare_order(
    kitchen: Arc<KitchenInner>,
    order: Arc<OrderEntry>,
    slot: PreparationSlot,
    ready_tx: mpsc::UnboundedSender<Arc<OrderEntry>>,
) {
    if let Err(e) = order.advance(OrderStatus::Preparing) {
        error!("[Restaurant #{}] {}", kitchen.restaurant_id, e);
    }
    info!(
        "[Restaurant #{}] Kitchen: Starting to prepare order #{} for {}",
        kitchen.restaurant_id,
        order.id(),
        order.customer_name()
    );

    let prep_time = preparation_time(order.raw_prep_time(), kitchen.chefs);
    order.set_prep_duration(prep_time);
    kitchen
        .clock
        .wait(
            prep_time,
            &format!(
                "Preparing order #{} for {}",
                order.id(),
                order.customer_name()
            ),
        )
        .await;

    if let Err(e) = order.advance(OrderStatus::Ready) {
        error!("[Restaurant #{}] {}", kitchen.restaurant_id, e);
    }
    drop(slot);

    info!(
        "[Restaurant #{}] Kitchen: Order #{} is ready for {} (prep time: {:?})",
        kitchen.restaurant_id,
        order.id(),
        order.customer_name(),
        prep_time
    );

    let order_id = order.id();
    if ready_tx.send(order).is_err() {
        warn!(
            "[Restaurant #{}] Ready queue closed, order #{} will not be delivered",
            kitchen.restaurant_id, order_id
        );
    }
}
