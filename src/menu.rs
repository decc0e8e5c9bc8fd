//! Menu catalog
//!
//! Static lookup from item key to name, price and preparation time. Items
//! are shared by value: an order keeps its own copy of every line item.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// A single item on the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: f64,
    #[serde(with = "humantime_serde")]
    pub prep_time: Duration,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, price: f64, prep_time: Duration) -> Self {
        Self {
            name: name.into(),
            price,
            prep_time,
        }
    }
}

/// Keyed collection of menu items
#[derive(Debug, Clone, Default)]
pub struct Menu {
    items: BTreeMap<String, MenuItem>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an item under `key`
    pub fn with_item(mut self, key: impl Into<String>, item: MenuItem) -> Self {
        self.items.insert(key.into(), item);
        self
    }

    pub fn get(&self, key: &str) -> Option<&MenuItem> {
        self.items.get(key)
    }

    /// Look up every key in order, failing on the first unknown one
    pub fn resolve<S: AsRef<str>>(&self, keys: &[S]) -> Result<Vec<MenuItem>> {
        keys.iter()
            .map(|key| {
                let key = key.as_ref();
                self.get(key)
                    .cloned()
                    .ok_or_else(|| SimError::unknown_menu_item(key))
            })
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn minutes(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}

/// The house menu
pub fn default_menu() -> Menu {
    Menu::new()
        .with_item("burger", MenuItem::new("Classic Burger", 12.99, minutes(8)))
        .with_item("pizza", MenuItem::new("Margherita Pizza", 15.99, minutes(12)))
        .with_item("pasta", MenuItem::new("Spaghetti Carbonara", 14.99, minutes(10)))
        .with_item("salad", MenuItem::new("Caesar Salad", 9.99, minutes(5)))
        .with_item("soup", MenuItem::new("Tomato Soup", 6.99, minutes(3)))
        .with_item("fries", MenuItem::new("French Fries", 4.99, minutes(4)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_default_menu_contents() {
        let menu = default_menu();
        assert_eq!(menu.len(), 6);

        let pizza = menu.get("pizza").expect("pizza should be on the menu");
        assert_eq!(pizza.name, "Margherita Pizza");
        assert_eq!(pizza.prep_time, Duration::from_secs(720));

        let keys: Vec<_> = menu.keys().collect();
        assert_eq!(keys, vec!["burger", "fries", "pasta", "pizza", "salad", "soup"]);
    }

    #[test]
    fn test_resolve_preserves_order() {
        let menu = default_menu();
        let items = menu.resolve(&["soup", "burger", "soup"]).unwrap();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Tomato Soup", "Classic Burger", "Tomato Soup"]);
    }

    #[test]
    fn test_resolve_unknown_key() {
        let err = default_menu().resolve(&["burger", "sushi"]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MENU_UNKNOWN_ITEM);
        assert!(err.to_string().contains("sushi"));
    }

    #[test]
    fn test_item_serializes_human_duration() {
        let item = MenuItem::new("Tomato Soup", 6.99, minutes(3));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["prep_time"], "3m");
    }
}
