/// Error code registry for the restaurant simulator
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Menu errors
/// - 3000-3999: Order lifecycle errors
/// - 4000-4999: Pipeline errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_PARSE_ERROR: u16 = 1002;
    pub const CONFIG_INVALID_RESTAURANT: u16 = 1003;
    pub const CONFIG_INVALID_MODE: u16 = 1004;
    pub const CONFIG_INVALID_CHEFS: u16 = 1005;
    pub const CONFIG_INVALID_CAPACITY: u16 = 1006;
    pub const CONFIG_INVALID_DELIVERY_WINDOW: u16 = 1007;

    // Menu errors (2000-2999)
    pub const MENU_UNKNOWN_ITEM: u16 = 2001;

    // Order lifecycle errors (3000-3999)
    pub const ORDER_INVALID_TRANSITION: u16 = 3001;

    // Pipeline errors (4000-4999)
    pub const PIPELINE_KITCHEN_CLOSED: u16 = 4001;
    pub const PIPELINE_NO_RUNTIME: u16 = 4002;
}

/// Get a short description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::CONFIG_NOT_FOUND => "Configuration file could not be read",
        ErrorCode::CONFIG_PARSE_ERROR => "Configuration file is not valid TOML",
        ErrorCode::CONFIG_INVALID_RESTAURANT => "Restaurant number must be between 1 and 999",
        ErrorCode::CONFIG_INVALID_MODE => "Mode must be 'realtime' or 'fastforward'",
        ErrorCode::CONFIG_INVALID_CHEFS => "Chef count must be at least 1",
        ErrorCode::CONFIG_INVALID_CAPACITY => "Kitchen capacity must be at least 1",
        ErrorCode::CONFIG_INVALID_DELIVERY_WINDOW => "Delivery window is empty or starts at zero",
        ErrorCode::MENU_UNKNOWN_ITEM => "Item is not on the menu",
        ErrorCode::ORDER_INVALID_TRANSITION => "Order status may only move to its successor",
        ErrorCode::PIPELINE_KITCHEN_CLOSED => "Kitchen is no longer accepting orders",
        ErrorCode::PIPELINE_NO_RUNTIME => "Pipeline tasks need a running tokio runtime",
        _ => "Unknown error code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_described() {
        for code in [
            ErrorCode::CONFIG_NOT_FOUND,
            ErrorCode::CONFIG_INVALID_RESTAURANT,
            ErrorCode::MENU_UNKNOWN_ITEM,
            ErrorCode::ORDER_INVALID_TRANSITION,
            ErrorCode::PIPELINE_KITCHEN_CLOSED,
        ] {
            assert_ne!(describe_error_code(code), "Unknown error code");
        }
        assert_eq!(describe_error_code(9999), "Unknown error code");
    }
}
