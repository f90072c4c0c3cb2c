// handlers/elevated/home.rs - GET /homeAdm

use axum::{extract::State, Extension};

use crate::handlers::{page_context, PageResult};
use crate::session::CurrentSession;
use crate::state::AppState;
use crate::views::{render, HomeAdmPage};

pub async fn home_adm(State(state): State<AppState>, Extension(current): Extension<CurrentSession>) -> PageResult {
    render(&HomeAdmPage {
        ctx: page_context(&state, &current, "Painel").await,
    })
}
