//! Webhook request signature (`x-line-signature`)
//!
//! The platform signs the raw request body with HMAC-SHA256 keyed by the
//! channel secret and sends the base64 digest in a header.

use base64::prelude::{Engine, BASE64_STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Missing signature")]
    Missing,
    #[error("Signature is not valid base64")]
    Malformed,
    #[error("Signature does not match request body")]
    Mismatch,
    #[error("Channel secret is not a usable key")]
    InvalidKey,
}

fn mac(channel_secret: &str, body: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .map_err(|_| SignatureError::InvalidKey)?;
    mac.update(body);
    Ok(mac)
}

/// Compute the signature the platform would send for `body`
#[cfg(test)]
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mac = mac(channel_secret, body).unwrap();
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

/// Check a received signature against the raw body in constant time
pub fn verify(channel_secret: &str, body: &[u8], signature: Option<&str>) -> Result<(), SignatureError> {
    let signature = signature
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(SignatureError::Missing)?;
    let expected = BASE64_STANDARD
        .decode(signature)
        .map_err(|_| SignatureError::Malformed)?;

    mac(channel_secret, body)?
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}
