//! Peatio request signing
//!
//! Every private request carries `access_key`, `tonce` (milliseconds) and
//! `signature = hex(HMAC-SHA256(secret, "VERB|path|query"))`, where `query`
//! is the form-encoded parameter list sorted by key, signature excluded.

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

type HmacSha256 = Hmac<Sha256>;

/// Get current time in milliseconds
pub fn current_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Canonical query string: params stable-sorted by key, then form-encoded
///
/// Uses the same encoder reqwest applies to `.query()` and `.form()`, so the
/// signed bytes match the bytes on the wire.
pub fn canonical_query(params: &[(String, String)]) -> ExchangeResult<String> {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    serde_urlencoded::to_string(&sorted)
        .map_err(|e| ExchangeError::InvalidOrder(format!("Cannot encode request params: {}", e)))
}

/// Sign a request payload
pub fn sign(secret: &str, verb: &str, path: &str, params: &[(String, String)]) -> ExchangeResult<String> {
    let payload = format!("{}|{}|{}", verb, path, canonical_query(params)?);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::Unauthorized(format!("Invalid secret key: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Append `access_key`, `tonce` and `signature` to the request params
pub fn signed_params(
    access_key: &str,
    secret_key: &str,
    verb: &str,
    path: &str,
    params: &[(String, String)],
    tonce: u64,
) -> ExchangeResult<Vec<(String, String)>> {
    let mut signed = params.to_vec();
    signed.push(("access_key".to_string(), access_key.to_string()));
    signed.push(("tonce".to_string(), tonce.to_string()));
    let signature = sign(secret_key, verb, path, &signed)?;
    signed.push(("signature".to_string(), signature));
    Ok(signed)
}
