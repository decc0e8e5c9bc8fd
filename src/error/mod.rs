use std::path::PathBuf;
use thiserror::Error;

use crate::order::OrderStatus;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// The unified error type for the simulator
///
/// Nothing inside the running pipeline fails. These errors surface at the
/// boundary: configuration, menu lookup, and submitting into a kitchen
/// whose dispatch loop has gone away.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Unknown menu item: {key}")]
    UnknownMenuItem { code: u16, key: String },

    #[error("[E{code:04}] Order #{order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        code: u16,
        order_id: u64,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("[E{code:04}] Kitchen for restaurant #{restaurant_id} is closed")]
    KitchenClosed { code: u16, restaurant_id: u32 },

    #[error("[E{code:04}] Cannot start pipeline: {message}")]
    Runtime {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SimError {
    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            path: None,
            source: None,
        }
    }

    pub fn unknown_menu_item(key: impl Into<String>) -> Self {
        Self::UnknownMenuItem {
            code: ErrorCode::MENU_UNKNOWN_ITEM,
            key: key.into(),
        }
    }

    pub fn invalid_transition(order_id: u64, from: OrderStatus, to: OrderStatus) -> Self {
        Self::InvalidTransition {
            code: ErrorCode::ORDER_INVALID_TRANSITION,
            order_id,
            from,
            to,
        }
    }

    pub fn kitchen_closed(restaurant_id: u32) -> Self {
        Self::KitchenClosed {
            code: ErrorCode::PIPELINE_KITCHEN_CLOSED,
            restaurant_id,
        }
    }

    pub fn no_runtime(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Runtime {
            code: ErrorCode::PIPELINE_NO_RUNTIME,
            message: "no tokio runtime is running".to_string(),
            source: Some(source.into()),
        }
    }

    /// Attach the configuration file path this error came from
    pub fn with_path(mut self, config_path: impl Into<PathBuf>) -> Self {
        if let Self::Config { path, .. } = &mut self {
            *path = Some(config_path.into());
        }
        self
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        if let Self::Config { source: src, .. } = &mut self {
            *src = Some(source.into());
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::UnknownMenuItem { code, .. }
            | Self::InvalidTransition { code, .. }
            | Self::KitchenClosed { code, .. }
            | Self::Runtime { code, .. } => *code,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::UnknownMenuItem { .. } => 3,
            Self::InvalidTransition { .. } | Self::KitchenClosed { .. } | Self::Runtime { .. } => 1,
        }
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

/// Result type alias using SimError
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display_carries_code() {
        let err = SimError::config_with_code(
            ErrorCode::CONFIG_INVALID_RESTAURANT,
            "restaurant number must be between 1 and 999, got 0",
        );
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_RESTAURANT);
        assert!(err.to_string().starts_with("[E1003] Configuration error"));
        assert!(err.is_config());
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_with_path() {
        let err = SimError::config_with_code(ErrorCode::CONFIG_INVALID_CHEFS, "bad value")
            .with_path("/tmp/sim.toml");
        match err {
            SimError::Config { message, path, .. } => {
                assert_eq!(message, "bad value");
                assert_eq!(path, Some(PathBuf::from("/tmp/sim.toml")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_with_source_preserves_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = SimError::config_with_code(ErrorCode::CONFIG_NOT_FOUND, "cannot read").with_source(io);
        let source = std::error::Error::source(&err).expect("source should be attached");
        assert_eq!(source.to_string(), "missing");
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = SimError::invalid_transition(7, OrderStatus::Received, OrderStatus::Ready);
        assert_eq!(
            err.to_string(),
            "[E3001] Order #7 cannot move from received to ready"
        );
        assert!(!err.is_config());
    }
}
