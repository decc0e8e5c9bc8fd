//! # Restaurant Sim
//!
//! A concurrent restaurant order pipeline. Orders are queued for a kitchen
//! with a fixed number of preparation slots, prepared in parallel by a pool
//! of chefs, then handed to a delivery stage.
//!
//! ## Usage
//!
//! ```bash
//! restaurant-sim --restaurant 42 --mode ff
//! ```
//!
//! ## Modules
//!
//! - `clock` - Simulated time: real sleeps or logged fast-forward waits
//! - `config` - Simulation mode and TOML configuration with validation
//! - `delivery` - Delivery stage consuming the kitchen's ready queue
//! - `error` - Error type and error codes
//! - `kitchen` - Admission queue, preparation slots and preparation tasks
//! - `menu` - Menu catalog
//! - `order` - Orders and their lifecycle
//! - `restaurant` - Order registry, pipeline wiring and statistics
//! - `scenario` - The sample eight-order run
pub mod clock;
pub mod config;
pub mod delivery;
pub mod error;
pub mod kitchen;
pub mod menu;
pub mod order;
pub mod restaurant;
pub mod scenario;

pub use clock::SimClock;
pub use config::{SimulationConfig, SimulationMode};
pub use error::{Result, SimError};
pub use kitchen::Kitchen;
pub use menu::{default_menu, Menu, MenuItem};
pub use order::{Order, OrderStatus};
pub use restaurant::{Restaurant, RestaurantStats};
