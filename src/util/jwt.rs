use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::Engine as _;
use serde_json::{Map, Value};

/// Claims decoded from the payload segment of an ID token.
///
/// The signature is never checked here; the server verifies the token on exchange. The
/// claims are only used for diagnostics and for recovering the expiry of a restored token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenClaims {
    pub claims: Map<String, Value>,
}

impl TokenClaims {
    pub fn email(&self) -> Option<&str> {
        self.claims.get("email").and_then(Value::as_str)
    }

    pub fn subject(&self) -> Option<&str> {
        self.claims
            .get("user_id")
            .or_else(|| self.claims.get("sub"))
            .and_then(Value::as_str)
    }

    /// Expiry as seconds since the Unix epoch.
    pub fn expires_at(&self) -> Option<i64> {
        self.claims.get("exp").and_then(value_as_i64)
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.claims.get("iat").and_then(value_as_i64)
    }
}

/// Decodes the claims of a compact JWT, returning `None` when the token is malformed.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.split('.');
    let _header = parts.next()?;
    let payload = parts.next()?;
    parts.next()?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(claims) => Some(TokenClaims { claims }),
        _ => None,
    }
}

fn value_as_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|number| number as i64))
}

#[cfg(test)]
pub(crate) fn build_unsigned_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}
