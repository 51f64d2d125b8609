//! Bearer-token expiry decoding.
//!
//! Tokens are opaque to this crate except for the `exp` claim, which is
//! read straight out of the JWT payload segment. Signatures are never
//! verified here: the server is the authority, this crate only needs to
//! know whether a credential is worth attaching.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Malformed,

    #[error("failed to decode token payload: {0}")]
    Payload(#[from] base64::DecodeError),

    #[error("failed to parse token claims: {0}")]
    Claims(#[from] serde_json::Error),
}

/// Claims this crate cares about. Everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
    #[serde(default)]
    pub sub: Option<String>,
}

impl Claims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

/// Decode the payload segment of a JWT without verifying its signature.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_header), Some(payload), Some(_signature), None) => payload,
        _ => return Err(TokenError::Malformed),
    };
    let bytes = URL_SAFE_NO_PAD.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Whether a stored token is past its expiry.
///
/// A token that cannot be decoded counts as expired, which routes the
/// request into the refresh/logout path instead of attaching garbage.
pub fn is_expired(token: &str) -> bool {
    decode_claims(token).map(|c| c.is_expired()).unwrap_or(true)
}
