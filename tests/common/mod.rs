//! Common test utilities and helpers

#![allow(dead_code)]

use restaurant_sim::config::{SimulationConfig, SimulationMode};
use restaurant_sim::menu::MenuItem;
use restaurant_sim::restaurant::Restaurant;
use std::time::Duration;

/// Fast-forward restaurant with a fixed seed
pub fn fast_restaurant(chefs: usize, capacity: usize) -> Restaurant {
    restaurant_with_mode(SimulationMode::FastForward, chefs, capacity)
}

/// Real-time restaurant; pair with a paused tokio clock
pub fn realtime_restaurant(chefs: usize, capacity: usize) -> Restaurant {
    restaurant_with_mode(SimulationMode::RealTime, chefs, capacity)
}

fn restaurant_with_mode(mode: SimulationMode, chefs: usize, capacity: usize) -> Restaurant {
    let config = SimulationConfig {
        restaurant: 7,
        mode,
        chefs,
        capacity,
        seed: Some(2024),
        ..Default::default()
    };
    Restaurant::from_config(&config).expect("test configuration is valid")
}

/// A single dish that takes `prep` to make
pub fn dish(prep: Duration) -> Vec<MenuItem> {
    vec![MenuItem::new("Slow Roast", 20.0, prep)]
}
