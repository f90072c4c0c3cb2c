/// Shared types used across the codebase

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Kind of person account (`tipoUsuario` on the wire)
/// Declaration order is privilege order: the most privileged role compares greatest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    User,
    Employ,
    Admin,
}

impl Role {
    /// Lenient parse used for token claims and backend payloads.
    ///
    /// Case-insensitive, accepts `ROLE_`/`SCOPE_` prefixes and the
    /// lowercase role names the backend puts in its authorities.
    pub fn parse(raw: &str) -> Option<Role> {
        let upper = raw.trim().to_ascii_uppercase();
        let name = upper
            .strip_prefix("ROLE_")
            .or_else(|| upper.strip_prefix("SCOPE_"))
            .unwrap_or(&upper);

        match name {
            "USER" | "CLIENTE" | "CLIENT" => Some(Role::User),
            "EMPLOY" | "EMPLOYEE" | "FUNCIONARIO" => Some(Role::Employ),
            "ADMIN" | "ADMINISTRADOR" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Employ => "EMPLOY",
            Role::Admin => "ADMIN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "Cliente",
            Role::Employ => "Funcionário",
            Role::Admin => "Administrador",
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Employ)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Landing page after login
    pub fn home_path(&self) -> &'static str {
        if self.is_staff() {
            "/homeAdm"
        } else {
            "/homeCliente"
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Role::parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("unknown role '{}'", raw)))
    }
}

/// Unknown role strings become `None` instead of failing the whole record
pub fn deserialize_optional_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Role::parse))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "flash flash-success",
            FlashKind::Error => "flash flash-error",
        }
    }
}
