use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};

use crate::session::{clear_session_cookie, session_id_from_headers, CurrentSession, Session};
use crate::state::AppState;
use crate::types::{Flash, Role};

/// Roles that may use the back office
pub const STAFF: &[Role] = &[Role::Admin, Role::Employ];

/// Employee and administrator management
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

const MSG_SEM_PERMISSAO: &str = "ERRO: Você não tem permissão para acessar esta página.";

/// Who may enter a group of routes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Any logged-in user
    Authenticated,
    /// Logged-in users holding one of these roles
    Roles(&'static [Role]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denied {
    /// No session, or its token is past `exp`
    Unauthenticated,
    /// Logged in, but with a role outside the allowed set
    WrongRole(Role),
}

/// Response marker: the handler saw the backend reject the token, so the
/// guard must end the session on the way out.
#[derive(Clone, Copy, Debug)]
pub struct EndSession;

pub fn check_access(session: Option<&Session>, access: Access, now: DateTime<Utc>) -> Result<(), Denied> {
    let session = match session {
        Some(s) if !s.is_expired(now) => s,
        _ => return Err(Denied::Unauthenticated),
    };

    match access {
        Access::Authenticated => Ok(()),
        Access::Roles(roles) if roles.contains(&session.role) => Ok(()),
        Access::Roles(_) => Err(Denied::WrongRole(session.role)),
    }
}

/// Route guard middleware.
///
/// Loads the session named by the cookie, applies `check_access` and hands
/// the handler a `CurrentSession` snapshot through request extensions.
pub async fn require(
    State((state, access)): State<(AppState, Access)>,
    mut request: Request,
    next: Next,
) -> Response {
    let now = Utc::now();
    let session_config = &state.config.session;
    let path = request.uri().path().to_string();

    let id = session_id_from_headers(request.headers(), &session_config.cookie_name);
    let session = match id {
        Some(id) => state.sessions.get(&id).await,
        None => None,
    };

    match check_access(session.as_ref(), access, now) {
        Ok(()) => {}
        Err(Denied::Unauthenticated) => {
            tracing::debug!("Unauthenticated request to {}, redirecting to /", path);
            let mut response = Redirect::to("/").into_response();
            if let (Some(id), Some(_)) = (id, session.as_ref()) {
                // Expired token: forget the session entirely
                state.sessions.remove(&id).await;
                append_cookie(&mut response, clear_session_cookie(session_config));
            }
            return response;
        }
        Err(Denied::WrongRole(role)) => {
            tracing::debug!("Role {} may not access {}", role, path);
            if let Some(id) = id {
                state
                    .sessions
                    .update(&id, |s| s.flash = Some(Flash::error(MSG_SEM_PERMISSAO)))
                    .await;
            }
            return Redirect::to(role.home_path()).into_response();
        }
    }

    let (Some(id), Some(mut session)) = (id, session) else {
        return Redirect::to("/").into_response();
    };

    session.last_seen = now;
    state.sessions.update(&id, |s| s.last_seen = now).await;
    request.extensions_mut().insert(CurrentSession { id, session });

    let mut response = next.run(request).await;

    if response.extensions().get::<EndSession>().is_some() {
        tracing::info!("Ending session after token rejection on {}", path);
        state.sessions.remove(&id).await;
        append_cookie(&mut response, clear_session_cookie(session_config));
    }

    response
}

pub(crate) fn append_cookie(response: &mut Response, cookie: String) {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::error!("Invalid Set-Cookie value: {}", e),
    }
}
