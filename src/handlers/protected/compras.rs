// handlers/protected/compras.rs - the logged user's purchase history

use axum::{
    extract::{Path, Query, State},
    Extension,
};

use crate::backend::BackendError;
use crate::error::AppError;
use crate::handlers::{load_failed, page_context, PageResult, SearchQuery};
use crate::models::venda::sort_recent_first;
use crate::session::CurrentSession;
use crate::state::AppState;
use crate::views::{render, MinhasComprasPage, VendaDetalhesPage, VendaView};

const MSG_VENDA_NAO_ENCONTRADA: &str = "ERRO: Venda não encontrada.";

/// GET /minhasCompras?busca= - sales whose customer is the logged user, newest first
pub async fn minhas_compras(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Query(query): Query<SearchQuery>,
) -> PageResult {
    let mut vendas = state
        .backend
        .list_vendas(current.token())
        .await
        .map_err(load_failed("visualizar compras"))?;

    vendas.retain(|v| v.belongs_to(current.email()) && v.matches(query.term()));
    sort_recent_first(&mut vendas);

    render(&MinhasComprasPage {
        ctx: page_context(&state, &current, "Minhas compras").await,
        busca: query.term().to_string(),
        vendas: vendas.iter().map(VendaView::from).collect(),
    })
}

/// GET /detalhesCompra/:id - another user's sale is reported as missing
pub async fn detalhes_compra(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> PageResult {
    let venda = match state.backend.get_venda(current.token(), id).await {
        Ok(venda) => venda,
        Err(BackendError::NotFound(_)) => return Err(AppError::not_found(MSG_VENDA_NAO_ENCONTRADA)),
        Err(e) => return Err(AppError::backend(e, "visualizar compras")),
    };

    if !venda.belongs_to(current.email()) {
        tracing::debug!("User {} asked for sale {} of another customer", current.email(), id);
        return Err(AppError::not_found(MSG_VENDA_NAO_ENCONTRADA));
    }

    render(&VendaDetalhesPage {
        ctx: page_context(&state, &current, "Detalhes da compra").await,
        venda: VendaView::from(&venda),
        staff: false,
        back_url: "/minhasCompras".to_string(),
    })
}
