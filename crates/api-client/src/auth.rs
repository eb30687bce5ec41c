use hmac::{Hmac, Mac};
use sha2::Sha256;

// Create a type alias for the HMAC-SHA256 implementation.
type HmacSha256 = Hmac<Sha256>;

/// Creates an HMAC-SHA256 signature for a given query string.
///
/// Binance requires every private call to be signed over the exact query
/// string that is sent on the wire, timestamp and recvWindow included. The
/// caller is responsible for producing the canonical query string; this
/// function only signs it.
///
/// # Arguments
///
/// * `secret` - The user's API secret key.
/// * `query_string` - The full query string of the request, including the timestamp.
///
/// # Returns
///
/// A hexadecimal string representation of the signature.
pub fn sign_request(secret: &str, query_string: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");

    mac.update(query_string.as_bytes());

    let result = mac.finalize();
    hex::encode(result.into_bytes())
}
