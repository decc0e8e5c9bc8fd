//! Simulated time
//!
//! Every wait in the pipeline goes through [`SimClock::wait`]. In real-time
//! mode the wait sleeps; in fast-forward mode it logs the duration it would
//! have taken and yields so other tasks can run. Either way the duration is
//! added to the clock's running total.

use crate::config::SimulationMode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, trace};

/// Shared time source for one restaurant
#[derive(Debug, Clone)]
pub struct SimClock {
    mode: SimulationMode,
    simulated_nanos: Arc<AtomicU64>,
}

impl SimClock {
    pub fn new(mode: SimulationMode) -> Self {
        Self {
            mode,
            simulated_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    /// Wait for `duration` of simulated time
    pub async fn wait(&self, duration: Duration, description: &str) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.simulated_nanos.fetch_add(nanos, Ordering::Relaxed);

        match self.mode {
            SimulationMode::RealTime => {
                trace!("Sleeping {:?}: {}", duration, description);
                tokio::time::sleep(duration).await;
            }
            SimulationMode::FastForward => {
                info!("⏱️  [SIMULATED] {} (would take {:?})", description, duration);
                tokio::task::yield_now().await;
            }
        }
    }

    /// Sum of every duration waited on through this clock
    pub fn simulated_elapsed(&self) -> Duration {
        Duration::from_nanos(self.simulated_nanos.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_fast_forward_does_not_sleep() {
        let clock = SimClock::new(SimulationMode::FastForward);
        let start = Instant::now();

        clock.wait(Duration::from_secs(600), "long prep").await;
        clock.wait(Duration::from_secs(60), "short prep").await;

        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(clock.simulated_elapsed(), Duration::from_secs(660));
    }

    #[tokio::test(start_paused = true)]
    async fn test_real_time_sleeps_for_duration() {
        let clock = SimClock::new(SimulationMode::RealTime);
        let start = tokio::time::Instant::now();

        clock.wait(Duration::from_secs(3), "delivery").await;

        assert!(start.elapsed() >= Duration::from_secs(3));
        assert_eq!(clock.simulated_elapsed(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_clones_share_total() {
        let clock = SimClock::new(SimulationMode::FastForward);
        let other = clock.clone();

        other.wait(Duration::from_secs(5), "clone").await;

        assert_eq!(clock.simulated_elapsed(), Duration::from_secs(5));
        assert_eq!(clock.mode(), SimulationMode::FastForward);
    }
}
