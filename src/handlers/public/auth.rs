// handlers/public/auth.rs - landing page, login and logout

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use serde::Deserialize;

use crate::backend::BackendError;
use crate::handlers::PageResult;
use crate::middleware::guard::append_cookie;
use crate::session::{clear_session_cookie, session_cookie, session_id_from_headers, Session};
use crate::state::AppState;
use crate::types::Flash;
use crate::validation::LoginForm;
use crate::views::{render, InicialPage, LoginPage, PageContext};

const MSG_SESSAO_EXPIRADA: &str = "ERRO: Não autorizado. Token inválido ou expirado.";

#[derive(Debug, Default, Deserialize)]
pub struct InicialQuery {
    /// Set when a session ended because the backend rejected its token
    pub expirado: Option<String>,
}

/// GET / - landing page with login and sign-up links
pub async fn inicial(Query(query): Query<InicialQuery>) -> PageResult {
    let flash = query.expirado.map(|_| Flash::error(MSG_SESSAO_EXPIRADA));
    render(&InicialPage {
        ctx: PageContext::anonymous("Farmácia").with_flash(flash),
    })
}

/// GET /login
pub async fn login_page() -> PageResult {
    login_form("Login", String::new(), None)
}

/// GET /login-adm
pub async fn login_adm_page() -> PageResult {
    login_form("Login administrativo", String::new(), None)
}

/// GET /login-cliente
pub async fn login_cliente_page() -> PageResult {
    login_form("Login do cliente", String::new(), None)
}

pub(crate) fn login_form(heading: &str, email: String, flash: Option<Flash>) -> PageResult {
    render(&LoginPage {
        ctx: PageContext::anonymous(heading).with_flash(flash),
        heading: heading.to_string(),
        email,
    })
}

/// POST /login - exchange credentials for a token and open a session.
///
/// The person record is looked up to fill the user id, the name and, when
/// the token carries none, the role. A failed lookup keeps the token's role.
pub async fn login(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<LoginForm>) -> PageResult {
    let email = form.email.trim().to_string();

    if let Err(e) = form.validate() {
        return login_form("Login", email, Some(Flash::error(e.0)));
    }

    let token = match state.backend.login(&email, &form.senha).await {
        Ok(token) => token,
        Err(e) => {
            tracing::info!("Login refused for {}: {}", email, e);
            return login_form("Login", email, Some(Flash::error(login_error_message(&e))));
        }
    };

    let now = Utc::now();
    let mut session = match Session::from_token(&token, now) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Backend issued an unusable token for {}: {}", email, e);
            return login_form("Login", email, Some(Flash::error(format!("ERRO: {}", e))));
        }
    };
    if session.email.is_empty() {
        session.email = email.clone();
    }

    match state.backend.list_pessoas(&token).await {
        Ok(pessoas) => {
            if !session.enrich_from(&pessoas) {
                tracing::warn!("No person record found for {}", session.email);
            }
        }
        Err(e) => tracing::warn!("Could not load person record for {}: {}", session.email, e),
    }

    let session_config = &state.config.session;
    if let Some(previous) = session_id_from_headers(&headers, &session_config.cookie_name) {
        state.sessions.remove(&previous).await;
    }

    let home = session.home_path();
    tracing::info!("User {} logged in as {}", session.email, session.role);
    let id = state.sessions.insert(session).await;

    let mut response = Redirect::to(home).into_response();
    append_cookie(&mut response, session_cookie(session_config, id));
    Ok(response)
}

fn login_error_message(err: &BackendError) -> String {
    match err {
        BackendError::Unauthorized(_) | BackendError::Forbidden(_) => "ERRO: E-mail ou senha incorretos".to_string(),
        BackendError::Unreachable(_) | BackendError::Decode(_) => err.user_message("entrar"),
        other => format!("ERRO: {}", other.detail()),
    }
}

/// POST /logout - drop the session and its cookie
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session_config = &state.config.session;
    if let Some(id) = session_id_from_headers(&headers, &session_config.cookie_name) {
        if let Some(session) = state.sessions.remove(&id).await {
            tracing::info!("User {} logged out", session.email);
        }
    }

    let mut response = Redirect::to("/").into_response();
    append_cookie(&mut response, clear_session_cookie(session_config));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_errors_use_friendly_wording() {
        assert_eq!(
            login_error_message(&BackendError::Unauthorized("Bad credentials".into())),
            "ERRO: E-mail ou senha incorretos"
        );
        assert_eq!(
            login_error_message(&BackendError::Unreachable("refused".into())),
            "ERRO: Não foi possível conectar ao servidor."
        );
        assert_eq!(
            login_error_message(&BackendError::Rejected {
                status: 400,
                message: "Usuário inativo".into()
            }),
            "ERRO: Usuário inativo"
        );
    }
}
