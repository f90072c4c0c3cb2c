// Authentication/session context: who is logged in, with which token and role

pub mod cookies;
pub mod store;

pub use cookies::{clear_session_cookie, session_cookie, session_id_from_headers};
pub use store::SessionStore;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{self, JwtError};
use crate::cart::Cart;
use crate::models::Pessoa;
use crate::types::{Flash, Role};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Token inválido: {0}")]
    InvalidToken(String),

    #[error("Token expirado")]
    Expired,
}

impl From<JwtError> for SessionError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => SessionError::Expired,
            JwtError::Malformed(msg) => SessionError::InvalidToken(msg),
        }
    }
}

/// Per-browser state kept on the server
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub role: Role,
    /// Whether `role` came from the token (otherwise from the person record or the default)
    pub role_from_token: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub user_id: Option<i64>,
    pub nome: Option<String>,
    pub cart: Cart,
    pub flash: Option<Flash>,
    /// Cart product ids picked for the payment page
    pub checkout: Option<Vec<i64>>,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    /// Build a session from a freshly issued token.
    ///
    /// Malformed and already expired tokens are refused. The role defaults
    /// to `USER` until the person record says otherwise.
    pub fn from_token(token: &str, now: DateTime<Utc>) -> Result<Self, SessionError> {
        let claims = auth::decode_current(token, now)?;
        let token_role = claims.role();

        Ok(Self {
            token: token.trim().to_string(),
            email: claims.subject().unwrap_or_default().to_string(),
            role: token_role.unwrap_or(Role::User),
            role_from_token: token_role.is_some(),
            expires_at: claims.expires_at(),
            user_id: None,
            nome: None,
            cart: Cart::new(),
            flash: None,
            checkout: None,
            last_seen: now,
        })
    }

    /// A session without expiry date never expires
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    pub fn home_path(&self) -> &'static str {
        self.role.home_path()
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Fill id, name and (when the token had none) the role from `/pessoa/all`.
    /// Returns whether a matching record was found.
    pub fn enrich_from(&mut self, pessoas: &[Pessoa]) -> bool {
        let Some(pessoa) = pessoas.iter().find(|p| p.has_email(&self.email)) else {
            return false;
        };
        self.user_id = Some(pessoa.id);
        if !pessoa.nome.trim().is_empty() {
            self.nome = Some(pessoa.nome.clone());
        }
        if !self.role_from_token {
            self.role = pessoa.role();
        }
        true
    }

    pub fn display_name(&self) -> &str {
        self.nome.as_deref().unwrap_or(&self.email)
    }

    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }
}

/// Session snapshot handed to guarded handlers through request extensions
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub id: Uuid,
    pub session: Session,
}

impl CurrentSession {
    pub fn token(&self) -> &str {
        &self.session.token
    }

    pub fn role(&self) -> Role {
        self.session.role
    }

    pub fn email(&self) -> &str {
        &self.session.email
    }
}
