//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::CustomerNotFound
            | Self::OrderNotFound
            | Self::PaymentNotFound
            | Self::MenuNotFound
            | Self::CartItemNotFound
            | Self::WishlistItemNotFound
            | Self::IngredientNotFound
            | Self::TableNotFound
            | Self::ReservationNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::DuplicateEmail
            | Self::InvalidTransition
            | Self::OrderNotPending
            | Self::OrderHasSettledPayment
            | Self::MenuAlreadyInWishlist
            | Self::IngredientNameExists
            | Self::TableUnavailable
            | Self::TableNumberExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::InvalidSignature => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            // 429 Too Many Requests
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            // 502 Bad Gateway
            Self::GatewayError | Self::GatewayTimeout => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable
            Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::OrderEmpty
            | Self::UnknownTransactionStatus
            | Self::ReservationInPast
            | Self::GuestCountExceedsCapacity => StatusCode::BAD_REQUEST,
        }
    }
}
