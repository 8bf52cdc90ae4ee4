//! Access-token utilities for the document store

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::common::errors::{Result, SyncError};

type HmacSha256 = Hmac<Sha256>;

/// Claims carried inside an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Operator account the token was minted for
    pub user: String,
    /// Unix timestamp (seconds) the token was issued at
    pub iat: i64,
}

/// Mint a compact signed access token: `base64(claims).base64(hmac)`.
///
/// The token goes on REST requests as the `auth` query parameter and into
/// the websocket `listen` frame, so both halves are URL-safe base64.
pub fn mint_access_token(secret: &str, username: &str) -> Result<String> {
    let claims = TokenClaims {
        user: username.to_string(),
        iat: chrono::Utc::now().timestamp(),
    };
    let payload = BASE64.encode(serde_json::to_vec(&claims)?);
    let signature = sign_payload(secret, &payload)?;
    Ok(format!("{}.{}", payload, signature))
}

/// Verify a token's signature and return its claims
pub fn verify_access_token(secret: &str, token: &str) -> Result<TokenClaims> {
    let (payload, signature) = token
        .split_once('.')
        .ok_or_else(|| SyncError::Authentication("malformed token".to_string()))?;

    let expected = sign_payload(secret, payload)?;
    if expected != signature {
        return Err(SyncError::Authentication("signature mismatch".to_string()));
    }

    let payload_bytes = BASE64
        .decode(payload)
        .map_err(|e| SyncError::Authentication(format!("invalid payload encoding: {}", e)))?;
    Ok(serde_json::from_slice(&payload_bytes)?)
}

fn sign_payload(secret: &str, payload: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| SyncError::Authentication(format!("failed to create HMAC: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
