//! Unified error codes for the bakery backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Customer errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu, cart, wishlist and inventory errors
//! - 7xxx: Table and reservation errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so front-ends can switch on the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Request body could not be parsed
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Webhook signature does not match
    InvalidSignature = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 3xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 3001,
    /// Email already registered
    DuplicateEmail = 3002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Status transition not permitted
    InvalidTransition = 4003,
    /// Order is not awaiting payment
    OrderNotPending = 4004,
    /// Order has a settled payment
    OrderHasSettledPayment = 4005,

    // ==================== 5xxx: Payment ====================
    /// Payment not found
    PaymentNotFound = 5001,
    /// Payment gateway rejected or failed the request
    GatewayError = 5002,
    /// Payment gateway did not answer in time
    GatewayTimeout = 5003,
    /// Unrecognized gateway transaction status
    UnknownTransactionStatus = 5004,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuNotFound = 6001,
    /// Cart line not found
    CartItemNotFound = 6101,
    /// Menu item already in wishlist
    MenuAlreadyInWishlist = 6201,
    /// Wishlist entry not found
    WishlistItemNotFound = 6202,
    /// Ingredient not found
    IngredientNotFound = 6301,
    /// Ingredient name already exists
    IngredientNameExists = 6302,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is not available for the requested day
    TableUnavailable = 7002,
    /// Table number already exists
    TableNumberExists = 7003,
    /// Reservation not found
    ReservationNotFound = 7101,
    /// Reservation date is not in the future
    ReservationInPast = 7102,
    /// Guest count exceeds table capacity
    GuestCountExceedsCapacity = 7103,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Request timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Rate limit exceeded
    TooManyRequests = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Token expired",
            ErrorCode::TokenInvalid => "Invalid token",
            ErrorCode::InvalidSignature => "Invalid signature",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin role required",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::DuplicateEmail => "Email already registered",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::InvalidTransition => "Status transition not permitted",
            ErrorCode::OrderNotPending => "Order is not awaiting payment",
            ErrorCode::OrderHasSettledPayment => "Order has a settled payment",

            // Payment
            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::GatewayError => "Payment gateway error",
            ErrorCode::GatewayTimeout => "Payment gateway timed out",
            ErrorCode::UnknownTransactionStatus => "Unknown transaction status",

            // Menu
            ErrorCode::MenuNotFound => "Menu not found",
            ErrorCode::CartItemNotFound => "Cart item not found",
            ErrorCode::MenuAlreadyInWishlist => "Menu already in wishlist",
            ErrorCode::WishlistItemNotFound => "Wishlist item not found",
            ErrorCode::IngredientNotFound => "Ingredient not found",
            ErrorCode::IngredientNameExists => "Ingredient name already exists",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableUnavailable => "Table is not available",
            ErrorCode::TableNumberExists => "Table number already exists",
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationInPast => "Reservation date must be in the future",
            ErrorCode::GuestCountExceedsCapacity => "Guest count exceeds table capacity",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Request timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::TooManyRequests => "Too many requests, please retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::InvalidSignature),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),

            // Customer
            3001 => Ok(ErrorCode::CustomerNotFound),
            3002 => Ok(ErrorCode::DuplicateEmail),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::InvalidTransition),
            4004 => Ok(ErrorCode::OrderNotPending),
            4005 => Ok(ErrorCode::OrderHasSettledPayment),

            // Payment
            5001 => Ok(ErrorCode::PaymentNotFound),
            5002 => Ok(ErrorCode::GatewayError),
            5003 => Ok(ErrorCode::GatewayTimeout),
            5004 => Ok(ErrorCode::UnknownTransactionStatus),

            // Menu
            6001 => Ok(ErrorCode::MenuNotFound),
            6101 => Ok(ErrorCode::CartItemNotFound),
            6201 => Ok(ErrorCode::MenuAlreadyInWishlist),
            6202 => Ok(ErrorCode::WishlistItemNotFound),
            6301 => Ok(ErrorCode::IngredientNotFound),
            6302 => Ok(ErrorCode::IngredientNameExists),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableUnavailable),
            7003 => Ok(ErrorCode::TableNumberExists),
            7101 => Ok(ErrorCode::ReservationNotFound),
            7102 => Ok(ErrorCode::ReservationInPast),
            7103 => Ok(ErrorCode::GuestCountExceedsCapacity),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::TooManyRequests),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::InvalidSignature.code(), 1005);
        assert_eq!(ErrorCode::DuplicateEmail.code(), 3002);
        assert_eq!(ErrorCode::InvalidTransition.code(), 4003);
        assert_eq!(ErrorCode::GatewayError.code(), 5002);
        assert_eq!(ErrorCode::MenuAlreadyInWishlist.code(), 6201);
        assert_eq!(ErrorCode::TableUnavailable.code(), 7002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::OrderNotFound.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(4005), Ok(ErrorCode::OrderHasSettledPayment));
        assert_eq!(ErrorCode::try_from(7103), Ok(ErrorCode::GuestCountExceedsCapacity));
        assert_eq!(ErrorCode::try_from(9006), Ok(ErrorCode::TooManyRequests));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(8001), Err(InvalidErrorCode(8001)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::TableUnavailable).unwrap();
        assert_eq!(json, "7002");
        let back: ErrorCode = serde_json::from_str("4003").unwrap();
        assert_eq!(back, ErrorCode::InvalidTransition);
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::OrderNotFound.message(), "Order not found");
        assert_eq!(ErrorCode::InvalidSignature.message(), "Invalid signature");
    }
}
