// handlers/mod.rs - page handlers, grouped by access tier
//
// public    -> no session required (landing, login, sign-up, health)
// protected -> any logged-in user (catalog, cart, checkout, purchases)
// elevated  -> staff only (people, products, sales back office)

pub mod elevated;
pub mod protected;
pub mod public;

use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::backend::BackendError;
use crate::error::AppError;
use crate::session::{CurrentSession, Session};
use crate::state::AppState;
use crate::types::Flash;
use crate::views::PageContext;

pub type PageResult = Result<Response, AppError>;

/// `?busca=` of the list pages
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub busca: String,
}

impl SearchQuery {
    pub fn term(&self) -> &str {
        self.busca.trim()
    }
}

/// Layout context for a guarded page; consumes the session's pending flash
pub async fn page_context(state: &AppState, current: &CurrentSession, title: &str) -> PageContext {
    let flash = state
        .sessions
        .update(&current.id, Session::take_flash)
        .await
        .flatten();
    PageContext::for_session(title, &current.session).with_flash(flash)
}

/// Store a flash for the next page and redirect there
pub async fn flash_redirect(state: &AppState, current: &CurrentSession, flash: Flash, to: &str) -> Response {
    state.sessions.update(&current.id, |s| s.flash = Some(flash)).await;
    Redirect::to(to).into_response()
}

/// Failed backend call from a form action.
///
/// A rejected token ends the session; anything else goes back to `back`
/// with the error in the message box.
pub async fn action_failed(
    state: &AppState,
    current: &CurrentSession,
    err: BackendError,
    action: &str,
    back: &str,
) -> PageResult {
    if err.is_unauthorized() {
        return Err(AppError::backend(err, action));
    }
    let message = err.user_message(action);
    Ok(flash_redirect(state, current, Flash::error(message), back).await)
}

/// Map a backend error from a page load, using `action` for the 403 wording
pub fn load_failed(action: &'static str) -> impl Fn(BackendError) -> AppError {
    move |err| AppError::backend(err, action)
}
