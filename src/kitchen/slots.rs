//! Preparation slots
//!
//! A counting semaphore gates admission. Each held permit is paired with an
//! increment of the [`SlotGauge`], so the load visible to readers is always
//! the number of outstanding [`PreparationSlot`]s.

use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::error;

#[derive(Debug, Default, Clone, Copy)]
struct GaugeState {
    current: usize,
    peak: usize,
}

/// Occupied-slot counter with a high-water mark
#[derive(Debug)]
pub struct SlotGauge {
    capacity: usize,
    state: Mutex<GaugeState>,
}

impl SlotGauge {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(GaugeState::default()),
        }
    }

    fn occupy(&self) -> usize {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.current += 1;
        if state.current > self.capacity {
            error!(
                "Kitchen load {} exceeds capacity {}",
                state.current, self.capacity
            );
        }
        state.peak = state.peak.max(state.current);
        state.current
    }

    fn release(&self) -> usize {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match state.current.checked_sub(1) {
            Some(current) => state.current = current,
            None => error!("Kitchen load released below zero"),
        }
        state.current
    }

    pub fn current(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
    }

    /// Highest load ever observed
    pub fn peak(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .peak
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// One occupied unit of kitchen capacity, released on drop
#[derive(Debug)]
pub struct PreparationSlot {
    gauge: Arc<SlotGauge>,
    // Dropped after `Drop::drop` has already lowered the gauge, so a waiting
    // order can never observe the gauge above capacity.
    _permit: OwnedSemaphorePermit,
}

impl Drop for PreparationSlot {
    fn drop(&mut self) {
        self.gauge.release();
    }
}

/// Semaphore-backed pool of preparation slots
#[derive(Debug, Clone)]
pub struct SlotPool {
    semaphore: Arc<Semaphore>,
    gauge: Arc<SlotGauge>,
}

impl SlotPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            gauge: Arc::new(SlotGauge::new(capacity)),
        }
    }

    /// Take a slot if one is free right now
    pub fn try_acquire(&self) -> Option<PreparationSlot> {
        let permit = self.semaphore.clone().try_acquire_owned().ok()?;
        Some(self.occupy(permit))
    }

    /// Wait for a free slot; `None` only if the pool was closed
    pub async fn acquire(&self) -> Option<PreparationSlot> {
        let permit = self.semaphore.clone().acquire_owned().await.ok()?;
        Some(self.occupy(permit))
    }

    #[cfg(test)]
    pub(crate) fn close(&self) {
        self.semaphore.close();
    }

    fn occupy(&self, permit: OwnedSemaphorePermit) -> PreparationSlot {
        self.gauge.occupy();
        PreparationSlot {
            gauge: self.gauge.clone(),
            _permit: permit,
        }
    }

    pub fn load(&self) -> usize {
        self.gauge.current()
    }

    pub fn peak(&self) -> usize {
        self.gauge.peak()
    }

    pub fn capacity(&self) -> usize {
        self.gauge.capacity()
    }
}
