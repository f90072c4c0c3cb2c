// handlers/elevated/vendas.rs - sales back office

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Extension,
};

use crate::backend::BackendError;
use crate::error::AppError;
use crate::handlers::{action_failed, flash_redirect, page_context, PageResult, SearchQuery};
use crate::models::{format_brl, venda::sort_recent_first, Pessoa, Produto, Role, Venda};
use crate::session::CurrentSession;
use crate::state::AppState;
use crate::types::Flash;
use crate::validation::VendaEditForm;
use crate::views::{render, ItemEditView, OptionView, VendaDetalhesPage, VendaEditarPage, VendaView, VendasListaPage};

const MSG_VENDA_NAO_ENCONTRADA: &str = "ERRO: Venda não encontrada.";

async fn load_venda(state: &AppState, current: &CurrentSession, id: i64) -> Result<Venda, AppError> {
    match state.backend.get_venda(current.token(), id).await {
        Ok(venda) => Ok(venda),
        Err(BackendError::NotFound(_)) => Err(AppError::not_found(MSG_VENDA_NAO_ENCONTRADA)),
        Err(e) => Err(AppError::backend(e, "visualizar vendas")),
    }
}

/// GET /listaVendas?busca= - every sale, newest first
pub async fn lista_vendas(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Query(query): Query<SearchQuery>,
) -> PageResult {
    let mut vendas = state
        .backend
        .list_vendas(current.token())
        .await
        .map_err(|e| AppError::backend(e, "visualizar vendas"))?;

    vendas.retain(|v| v.matches(query.term()));
    sort_recent_first(&mut vendas);

    render(&VendasListaPage {
        ctx: page_context(&state, &current, "Vendas").await,
        busca: query.term().to_string(),
        vendas: vendas.iter().map(VendaView::from).collect(),
    })
}

/// GET /detalhesVenda/:id
pub async fn detalhes_venda(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> PageResult {
    let venda = load_venda(&state, &current, id).await?;
    render(&VendaDetalhesPage {
        ctx: page_context(&state, &current, "Detalhes da venda").await,
        venda: VendaView::from(&venda),
        staff: true,
        back_url: "/listaVendas".to_string(),
    })
}

/// Active clients, plus the sale's own customer whatever its state
fn client_options(pessoas: &[Pessoa], venda: &Venda) -> Vec<OptionView> {
    let current_id = venda.usuario.as_ref().map(|u| u.id);
    pessoas
        .iter()
        .filter(|p| (p.is_kind(Role::User) && p.is_active()) || Some(p.id) == current_id)
        .map(|p| OptionView {
            id: p.id,
            label: format!("{} ({})", p.nome, p.email),
        })
        .collect()
}

/// Active products, plus those already in the sale
fn product_options(produtos: &[Produto], venda: &Venda) -> Vec<OptionView> {
    produtos
        .iter()
        .filter(|p| p.is_active() || venda.itens.iter().any(|i| i.id_produto == p.id_produto))
        .map(|p| OptionView {
            id: p.id_produto,
            label: format!("{} - {}", p.nome, format_brl(p.preco)),
        })
        .collect()
}

/// GET /editarVenda/:id - customer and line items
pub async fn editar_venda_page(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> PageResult {
    let venda = load_venda(&state, &current, id).await?;
    let pessoas = state
        .backend
        .list_pessoas(current.token())
        .await
        .map_err(|e| AppError::backend(e, "visualizar clientes"))?;
    let produtos = state
        .backend
        .list_produtos(current.token())
        .await
        .map_err(|e| AppError::backend(e, "visualizar produtos"))?;

    render(&VendaEditarPage {
        ctx: page_context(&state, &current, "Editar venda").await,
        id,
        id_usuario: venda.usuario.as_ref().map(|u| u.id).unwrap_or_default(),
        clientes: client_options(&pessoas, &venda),
        produtos: product_options(&produtos, &venda),
        itens: venda
            .itens
            .iter()
            .map(|i| ItemEditView {
                id_produto: i.id_produto,
                quantidade: i.quantidade,
            })
            .collect(),
    })
}

/// POST /editarVenda/:id
///
/// The trailing blank line of the form is the "add product" slot and is
/// dropped when left empty.
pub async fn editar_venda(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
    body: Bytes,
) -> PageResult {
    let back = format!("/editarVenda/{}", id);
    let mut form = VendaEditForm::parse(&body);
    form.itens.retain(|(produto, quantidade)| produto.is_some() || quantidade.is_some());

    let request = match form.validate() {
        Ok(request) => request,
        Err(e) => return Ok(flash_redirect(&state, &current, Flash::error(e.0), &back).await),
    };

    match state.backend.update_venda(current.token(), id, &request).await {
        Ok(_) => {
            tracing::info!("Sale {} updated by {}", id, current.email());
            let flash = Flash::success("SUCESSO: Venda atualizada com sucesso!");
            Ok(flash_redirect(&state, &current, flash, &format!("/detalhesVenda/{}", id)).await)
        }
        Err(e) => action_failed(&state, &current, e, "editar vendas", &back).await,
    }
}

/// POST /excluirVenda/:id - soft delete
pub async fn excluir_venda(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> PageResult {
    match state.backend.delete_venda(current.token(), id).await {
        Ok(_) => {
            tracing::info!("Sale {} deleted by {}", id, current.email());
            let flash = Flash::success("SUCESSO: Venda marcada como excluída!");
            Ok(flash_redirect(&state, &current, flash, "/listaVendas").await)
        }
        Err(e) => action_failed(&state, &current, e, "excluir vendas", "/listaVendas").await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn venda() -> Venda {
        serde_json::from_value(json!({
            "idVenda": 3,
            "usuario": {"id": 9, "nome": "Inativo", "email": "i@x.com", "dataExclusao": "2025-01-01"},
            "dataCompra": "2025-03-01",
            "itens": [{"idProduto": 2, "nomeProduto": "B", "quantidade": 1, "precoUnitario": 5, "subTotal": 5}]
        }))
        .unwrap()
    }

    #[test]
    fn options_keep_the_sale_own_records() {
        let pessoas: Vec<Pessoa> = serde_json::from_value(json!([
            {"id": 1, "nome": "Ana", "email": "a@x.com", "tipoUsuario": "USER"},
            {"id": 2, "nome": "Func", "email": "f@x.com", "tipoUsuario": "EMPLOY"},
            {"id": 8, "nome": "Velho", "email": "v@x.com", "dataExclusao": "2024-01-01"},
            {"id": 9, "nome": "Inativo", "email": "i@x.com", "dataExclusao": "2025-01-01"},
            {"id": 10, "nome": "Sem tipo", "email": "s@x.com"}
        ]))
        .unwrap();
        let ids: Vec<i64> = client_options(&pessoas, &venda()).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 9]);

        let produtos: Vec<Produto> = serde_json::from_value(json!([
            {"idProduto": 1, "nome": "A", "preco": 2.5},
            {"idProduto": 2, "nome": "B", "preco": 5, "dataExclusao": "2025-02-01"},
            {"idProduto": 3, "nome": "C", "preco": 1, "dataExclusao": "2025-02-01"}
        ]))
        .unwrap();
        let options = product_options(&produtos, &venda());
        assert_eq!(options.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(options[0].label, "A - R$ 2,50");
    }
}
