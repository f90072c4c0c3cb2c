// Page-level error types
use askama::Template;
use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::backend::BackendError;
use crate::middleware::guard::EndSession;
use crate::views::{ErrorPage, PageContext};

/// Failure of a page request, rendered as an HTML error page
#[derive(Debug)]
pub enum AppError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized: the backend rejected the session token
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (the pharmacy API answered with an error)
    BadGateway(String),

    // 503 Service Unavailable (the pharmacy API could not be reached)
    ServiceUnavailable(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::BadRequest(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::InternalServerError(_) => 500,
            AppError::BadGateway(_) => 502,
            AppError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get user-facing error message
    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg) => msg,
            AppError::Unauthorized(msg) => msg,
            AppError::Forbidden(msg) => msg,
            AppError::NotFound(msg) => msg,
            AppError::InternalServerError(msg) => msg,
            AppError::BadGateway(msg) => msg,
            AppError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for logs and the error page
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            AppError::BadGateway(_) => "BAD_GATEWAY",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Backend failure while doing `action` ("visualizar vendas", "excluir produtos", ...)
    pub fn backend(err: BackendError, action: &str) -> Self {
        let message = err.user_message(action);
        match err {
            BackendError::Unauthorized(_) => AppError::Unauthorized(message),
            BackendError::Forbidden(_) => AppError::Forbidden(message),
            BackendError::NotFound(_) => AppError::NotFound(message),
            BackendError::Rejected { .. } | BackendError::Decode(_) => AppError::BadGateway(message),
            BackendError::Unreachable(_) => AppError::ServiceUnavailable(message),
        }
    }
}

// Static constructor methods
impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        AppError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        AppError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        AppError::ServiceUnavailable(message.into())
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        if let BackendError::Decode(detail) = &err {
            tracing::error!("Backend payload could not be decoded: {}", detail);
        }
        AppError::backend(err, "acessar este recurso")
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        // Log the real error but return generic message
        tracing::error!("Template rendering error: {}", err);
        AppError::internal_server_error("ERRO: Falha ao montar a página.")
    }
}

// Standard error trait implementations
impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // A rejected token ends the session; the guard layer drops it and clears the cookie
        if let AppError::Unauthorized(_) = self {
            tracing::info!("Backend rejected the session token, ending session");
            let mut response = Redirect::to("/?expirado=1").into_response();
            response.extensions_mut().insert(EndSession);
            return response;
        }

        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let page = ErrorPage {
            ctx: PageContext::anonymous("Erro"),
            status: status.as_u16(),
            code: self.error_code(),
            message: self.message(),
        };

        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                (
                    status,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    self.message().to_string(),
                )
                    .into_response()
            }
        }
    }
}
