//! Authentication: JWT issuance, request middleware and rate limiting

pub mod jwt;
pub mod middleware;
pub mod rate_limit;

pub use jwt::{Claims, CurrentCustomer, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use rate_limit::RateLimiter;
