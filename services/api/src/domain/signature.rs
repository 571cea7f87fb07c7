//! Payment provider signature check.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 of `{payment_id}|{subscription_id}` under the shared secret.
pub fn subscription_signature(secret: &str, payment_id: &str, subscription_id: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payment_id.as_bytes());
    mac.update(b"|");
    mac.update(subscription_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Compare a supplied signature against the expected one in constant time.
pub fn verify_subscription_signature(
    secret: &str,
    payment_id: &str,
    subscription_id: &str,
    signature: &str,
) -> bool {
    let expected = subscription_signature(secret, payment_id, subscription_id);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}
