//! Caller identity decoded from a bearer token.
//!
//! Only the JWT payload segment is read. Signature verification belongs to the
//! server; the client uses the claims to decide which actions to offer and to
//! refuse obviously unauthorized writes before sending them.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// Who is calling, and with what global role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: String,
    pub role: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: role.into(),
        }
    }

    /// Decode the payload of a JWT-style bearer token.
    ///
    /// The user id is taken from `sub`, `id` or `userId`, in that order. A
    /// missing role decodes as an empty string, which matches no tier.
    ///
    /// # Errors
    ///
    /// [`BoardError::InvalidToken`] when the token is not three dot-separated
    /// segments, the payload is not base64url JSON, or no user id claim exists.
    pub fn from_bearer_token(token: &str) -> Result<Self, BoardError> {
        let token = token.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();

        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(BoardError::InvalidToken("expected three segments".into())),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| BoardError::InvalidToken(format!("payload is not base64url: {e}")))?;
        let claims: Claims = serde_json::from_slice(&bytes)
            .map_err(|e| BoardError::InvalidToken(format!("payload is not JSON claims: {e}")))?;

        let present = |claim: Option<String>| claim.filter(|id| !id.is_empty());
        let user_id = present(claims.sub)
            .or_else(|| present(claims.id))
            .or_else(|| present(claims.user_id))
            .ok_or_else(|| BoardError::InvalidToken("no sub, id or userId claim".into()))?;

        Ok(Self {
            user_id,
            role: claims.role.unwrap_or_default(),
        })
    }
}

/// Build an unsigned token carrying `claims`. Test helper for callers that
/// need a decodable credential.
#[doc(hidden)]
#[must_use]
pub fn unsigned_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}
