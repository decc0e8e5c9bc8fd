//! Sample run
//!
//! Eight customers arrive one to three simulated seconds apart, the
//! restaurant's statistics are logged after every third order, and the run
//! ends once every order has been delivered.

use crate::error::Result;
use crate::menu::Menu;
use crate::order::Order;
use crate::restaurant::{Restaurant, RestaurantStats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// One customer of the sample run
#[derive(Debug, Clone, Copy)]
pub struct SampleOrder {
    pub customer: &'static str,
    pub items: &'static [&'static str],
}

pub const SAMPLE_ORDERS: [SampleOrder; 8] = [
    SampleOrder {
        customer: "Alice Johnson",
        items: &["burger", "fries"],
    },
    SampleOrder {
        customer: "Bob Smith",
        items: &["pizza", "salad"],
    },
    SampleOrder {
        customer: "Carol Davis",
        items: &["pasta", "soup"],
    },
    SampleOrder {
        customer: "David Wilson",
        items: &["burger", "pizza", "fries"],
    },
    SampleOrder {
        customer: "Eva Brown",
        items: &["salad", "soup"],
    },
    SampleOrder {
        customer: "Frank Miller",
        items: &["pasta", "salad", "fries"],
    },
    SampleOrder {
        customer: "Grace Lee",
        items: &["pizza"],
    },
    SampleOrder {
        customer: "Henry Taylor",
        items: &["burger", "soup"],
    },
];

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub restaurant: String,
    pub stats: RestaurantStats,
    pub orders: Vec<Order>,
    #[serde(with = "humantime_serde")]
    pub simulated_elapsed: Duration,
}

/// Submit `orders` to `restaurant` and wait for all of them to be delivered
pub async fn run(
    restaurant: &Restaurant,
    menu: &Menu,
    orders: &[SampleOrder],
    seed: Option<u64>,
) -> Result<ScenarioReport> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let id = restaurant.id();

    // Resolve everything up front so a bad item fails before any order is placed.
    let resolved = orders
        .iter()
        .map(|sample| {
            menu.resolve(sample.items)
                .map(|items| (sample.customer, items))
        })
        .collect::<Result<Vec<_>>>()?;

    for (i, (customer, items)) in resolved.into_iter().enumerate() {
        let pause = Duration::from_secs(rng.random_range(1..=3));
        restaurant
            .clock()
            .wait(pause, &format!("Creating order #{}", i + 1))
            .await;

        restaurant.create_order(customer, items)?;

        if (i + 1) % 3 == 0 {
            info!("[Restaurant #{}] Stats: {}", id, restaurant.stats());
        }
    }

    info!(
        "[Restaurant #{}] Waiting for all orders to be processed...",
        id
    );
    restaurant.wait_until_drained().await;

    let report = ScenarioReport {
        restaurant: restaurant.name().to_string(),
        stats: restaurant.stats(),
        orders: restaurant.orders(),
        simulated_elapsed: restaurant.clock().simulated_elapsed(),
    };
    log_summary(id, &report);
    Ok(report)
}

fn log_summary(id: u32, report: &ScenarioReport) {
    info!("[Restaurant #{}] === FINAL RESTAURANT STATISTICS ===", id);
    info!("[Restaurant #{}] {}", id, report.stats);

    info!("[Restaurant #{}] === ORDER SUMMARY ===", id);
    for order in &report.orders {
        info!(
            "[Restaurant #{}] Order #{}: {} - {} - ${:.2} - prep {:?} - delivery {:?}",
            id,
            order.id,
            order.customer_name,
            order.status,
            order.total_amount,
            order.prep_duration.unwrap_or_default(),
            order.delivery_duration.unwrap_or_default()
        );
    }
    info!(
        "[Restaurant #{}] Restaurant simulation completed! Simulated time: {:?}",
        id, report.simulated_elapsed
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SimulationConfig, SimulationMode};
    use crate::error::ErrorCode;
    use crate::menu::default_menu;
    use crate::order::OrderStatus;

    fn restaurant() -> Restaurant {
        Restaurant::from_config(&SimulationConfig {
            mode: SimulationMode::FastForward,
            seed: Some(3),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_sample_orders_only_use_menu_items() {
        let menu = default_menu();
        for sample in SAMPLE_ORDERS {
            assert!(menu.resolve(sample.items).is_ok(), "{}", sample.customer);
        }
    }

    #[tokio::test]
    async fn test_sample_run_delivers_everything() {
        let restaurant = restaurant();
        let report = run(&restaurant, &default_menu(), &SAMPLE_ORDERS, Some(3))
            .await
            .unwrap();

        assert_eq!(report.stats.total_orders, 8);
        assert_eq!(report.stats.count(OrderStatus::Delivered), 8);
        assert_eq!(report.orders.len(), 8);
        assert_eq!(report.orders[0].customer_name, "Alice Johnson");
        assert_eq!(report.orders[7].customer_name, "Henry Taylor");
        assert!(report.simulated_elapsed > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_unknown_item_places_no_orders() {
        let restaurant = restaurant();
        let orders = [
            SampleOrder {
                customer: "Ivy",
                items: &["soup"],
            },
            SampleOrder {
                customer: "Jack",
                items: &["lobster"],
            },
        ];

        let err = run(&restaurant, &default_menu(), &orders, Some(1))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MENU_UNKNOWN_ITEM);
        assert_eq!(restaurant.stats().total_orders, 0);
    }
}
