//! Notification signature: `SHA-512(order_id ‖ status_code ‖ gross_amount ‖ server_key)`

use sha2::{Digest, Sha512};

/// Lowercase hex digest the provider is expected to send
pub fn signature_for(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time comparison against the received `signature_key`
pub fn verify_signature(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
    received: &str,
) -> bool {
    let expected = signature_for(order_id, status_code, gross_amount, server_key);
    constant_time_eq::constant_time_eq(expected.as_bytes(), received.as_bytes())
}
