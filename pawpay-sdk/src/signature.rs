//! Payment signature algorithm shared by server and clients.
//!
//! The gateway hands the checkout an HMAC over the order and payment
//! identifiers; the verification endpoint recomputes it before any donation
//! is recorded.  The signing payload is:
//!
//! ```text
//! {order_id}|{payment_id}
//! ```
//!
//! signed with `HMAC-SHA256(payload, secret)` and encoded as unpadded
//! base64.

/// Header name for admin API authentication (plaintext secret).
pub const ADMIN_AUTH_HEADER: &str = "Pawpay-Admin-Authorization";

/// Errors produced by signature operations.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid base64 encoding")]
    InvalidBase64,
    #[error("invalid signature")]
    SignatureMismatch,
}

impl From<ring::error::Unspecified> for SignatureError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

// ---------------------------------------------------------------------------
// Signing / verification
// ---------------------------------------------------------------------------

/// Assemble the canonical signing payload for a payment.
pub fn signing_payload(order_id: &str, payment_id: &str) -> String {
    format!("{order_id}|{payment_id}")
}

/// Sign a payment: `HMAC-SHA256("{order_id}|{payment_id}", key)`.
///
/// Returns the unpadded base64 signature string handed to the client on
/// successful authorization.
pub fn sign_payment(order_id: &str, payment_id: &str, key: &[u8]) -> String {
    let data = signing_payload(order_id, payment_id);
    let sig = ring::hmac::sign(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key),
        data.as_bytes(),
    );
    fast32::base64::RFC4648_NOPAD.encode(sig.as_ref())
}

/// Verify a payment signature in constant time.
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    key: &[u8],
) -> Result<(), SignatureError> {
    let signature_bytes = fast32::base64::RFC4648_NOPAD
        .decode_str(signature)
        .map_err(|_| SignatureError::InvalidBase64)?;
    let data = signing_payload(order_id, payment_id);
    ring::hmac::verify(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key),
        data.as_bytes(),
        &signature_bytes,
    )?;
    Ok(())
}
