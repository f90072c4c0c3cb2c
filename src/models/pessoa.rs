use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates;
use crate::types::{deserialize_optional_role, Role};
use crate::validation::only_digits;

/// Person record as returned by `/pessoa/*`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pessoa {
    #[serde(alias = "idPessoa")]
    pub id: i64,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub senha: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_role")]
    pub tipo_usuario: Option<Role>,
    #[serde(default, with = "dates::lenient")]
    pub data_exclusao: Option<NaiveDate>,
}

impl Pessoa {
    pub fn is_active(&self) -> bool {
        self.data_exclusao.is_none()
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_active() {
            "Ativo"
        } else {
            "Inativo"
        }
    }

    /// Role for the login session; records without `tipoUsuario` log in as clients
    pub fn role(&self) -> Role {
        self.tipo_usuario.unwrap_or(Role::User)
    }

    /// Strict kind check for listings: a missing or unknown `tipoUsuario` matches nothing
    pub fn is_kind(&self, role: Role) -> bool {
        self.tipo_usuario == Some(role)
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }

    /// Case-insensitive match on the name, or on the CPF digits
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        if self.nome.to_lowercase().contains(&term) {
            return true;
        }
        let digits = only_digits(&term);
        !digits.is_empty()
            && self
                .cpf
                .as_deref()
                .is_some_and(|cpf| only_digits(cpf).contains(&digits))
    }
}

/// Body of `/register`, `/pessoa/create` and `/pessoa/update/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PessoaRequest {
    pub nome: String,
    pub cpf: String,
    pub telefone: String,
    pub email: String,
    pub senha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_usuario: Option<Role>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
