use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Role;

/// Claims read from the pharmacy API token.
///
/// The front-end never holds the signing key, so the token is decoded
/// without signature verification; the API re-validates it on every call.
/// Role information may live in any of the claims below, depending on how
/// the API issued the token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, rename = "tipoUsuario", skip_serializing_if = "Option::is_none")]
    pub tipo_usuario: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorities: Option<Value>,
}

impl Claims {
    /// Most privileged role found in any role-bearing claim
    pub fn role(&self) -> Option<Role> {
        [
            &self.tipo_usuario,
            &self.role,
            &self.roles,
            &self.scope,
            &self.authorities,
        ]
        .into_iter()
        .flatten()
        .flat_map(roles_in)
        .max()
    }

    /// Login identity: `sub`, falling back to an `email` claim
    pub fn subject(&self) -> Option<&str> {
        self.sub
            .as_deref()
            .or(self.email.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Tokens without `exp` never expire on this side
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp.is_some_and(|exp| exp <= now.timestamp())
    }
}

/// Roles carried by one claim value: a string, a space or comma separated
/// string, an array of strings, or Spring's `[{"authority": ..}]` shape.
fn roles_in(value: &Value) -> Vec<Role> {
    match value {
        Value::String(s) => s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter_map(Role::parse)
            .collect(),
        Value::Array(items) => items.iter().flat_map(roles_in).collect(),
        Value::Object(map) => map.get("authority").map(roles_in).unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[derive(Debug)]
pub enum JwtError {
    Malformed(String),
    Expired,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Malformed(msg) => write!(f, "Malformed token: {}", msg),
            JwtError::Expired => write!(f, "Token expired"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Decode the token payload without checking its signature or expiry
pub fn decode_unverified(token: &str) -> Result<Claims, JwtError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(JwtError::Malformed("empty token".to_string()));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| JwtError::Malformed(e.to_string()))
}

/// Decode and reject tokens that are already past `exp`
pub fn decode_current(token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
    let claims = decode_unverified(token)?;
    if claims.is_expired(now) {
        return Err(JwtError::Expired);
    }
    Ok(claims)
}
