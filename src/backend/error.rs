use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failure of a pharmacy API call
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Não autorizado: {0}")]
    Unauthorized(String),

    #[error("Acesso negado: {0}")]
    Forbidden(String),

    #[error("Não encontrado: {0}")]
    NotFound(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Não foi possível conectar ao servidor: {0}")]
    Unreachable(String),

    #[error("Resposta inesperada do servidor: {0}")]
    Decode(String),
}

impl BackendError {
    /// Classify a non-2xx answer using its status and raw body
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| format!("Erro {}", status.as_u16()));
        match status {
            StatusCode::UNAUTHORIZED => BackendError::Unauthorized(message),
            StatusCode::FORBIDDEN => BackendError::Forbidden(message),
            StatusCode::NOT_FOUND => BackendError::NotFound(message),
            _ => BackendError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Unauthorized(_))
    }

    /// Message as the backend phrased it, without the variant prefix
    pub fn detail(&self) -> &str {
        match self {
            BackendError::Unauthorized(m)
            | BackendError::Forbidden(m)
            | BackendError::NotFound(m)
            | BackendError::Unreachable(m)
            | BackendError::Decode(m) => m,
            BackendError::Rejected { message, .. } => message,
        }
    }

    /// Flash text for a failed page action, `action` completes "Você não tem permissão para ..."
    pub fn user_message(&self, action: &str) -> String {
        match self {
            BackendError::Unauthorized(_) => "ERRO: Não autorizado. Token inválido ou expirado.".to_string(),
            BackendError::Forbidden(_) => format!("ERRO: Você não tem permissão para {}.", action),
            BackendError::Unreachable(_) => "ERRO: Não foi possível conectar ao servidor.".to_string(),
            BackendError::Decode(_) => "ERRO: Resposta inesperada do servidor.".to_string(),
            BackendError::NotFound(m) | BackendError::Rejected { message: m, .. } => format!("ERRO: {}", m),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            tracing::error!("Failed to decode backend response: {}", err);
            BackendError::Decode(err.to_string())
        } else {
            tracing::warn!("Backend request failed: {}", err);
            BackendError::Unreachable(err.to_string())
        }
    }
}

/// Pull a human message out of an error body.
///
/// Understands `{"message": ..}` (RestErrorMessage), a bean-validation
/// array of `{"message"|"defaultMessage": ..}` and plain text.
pub fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Ok(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| {
                    item.get("message")
                        .or_else(|| item.get("defaultMessage"))
                        .and_then(Value::as_str)
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join(", "))
            }
        }
        Ok(Value::String(s)) => Some(s),
        Ok(_) => None,
        // Not JSON: plain text, but not an HTML error page
        Err(_) if body.starts_with('<') => None,
        Err(_) => Some(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_rest_error_message() {
        let body = r#"{"status":"UNAUTHORIZED","message":"Credenciais inválidas","timestamp":"2025-01-01"}"#;
        assert_eq!(extract_message(body).as_deref(), Some("Credenciais inválidas"));
    }

    #[test]
    fn joins_validation_array() {
        let body = r#"[{"message":"CPF inválido"},{"defaultMessage":"O nome é obrigatório"}]"#;
        assert_eq!(
            extract_message(body).as_deref(),
            Some("CPF inválido, O nome é obrigatório")
        );
    }

    #[test]
    fn plain_text_and_empty_bodies() {
        assert_eq!(extract_message("Produto excluído").as_deref(), Some("Produto excluído"));
        assert_eq!(extract_message("   "), None);
        assert_eq!(extract_message("<html>oops</html>"), None);
    }

    #[test]
    fn status_mapping() {
        let err = BackendError::from_status(StatusCode::UNAUTHORIZED, "");
        assert!(err.is_unauthorized());
        assert_eq!(err.detail(), "Erro 401");

        let err = BackendError::from_status(StatusCode::BAD_REQUEST, r#"{"message":"Estoque insuficiente"}"#);
        assert!(matches!(err, BackendError::Rejected { status: 400, .. }));
        assert_eq!(err.user_message("criar venda"), "ERRO: Estoque insuficiente");

        let err = BackendError::from_status(StatusCode::FORBIDDEN, "");
        assert_eq!(
            err.user_message("excluir produtos"),
            "ERRO: Você não tem permissão para excluir produtos."
        );
    }
}
