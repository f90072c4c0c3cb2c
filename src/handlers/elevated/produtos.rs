// handlers/elevated/produtos.rs - product back office

use axum::{
    extract::{Path, Query, State},
    Extension, Form,
};
use chrono::{Local, NaiveDate};

use crate::backend::BackendError;
use crate::error::AppError;
use crate::handlers::{action_failed, flash_redirect, page_context, PageResult, SearchQuery};
use crate::models::Produto;
use crate::session::CurrentSession;
use crate::state::AppState;
use crate::types::Flash;
use crate::validation::{min_expiry_date, validate_produto, ProdutoForm};
use crate::views::{render, ProdutoDetalhesPage, ProdutoFormPage, ProdutoView, ProdutosListaPage};

const MSG_PRODUTO_NAO_ENCONTRADO: &str = "ERRO: Produto não encontrado.";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn load_produto(state: &AppState, current: &CurrentSession, id: i64) -> Result<Produto, AppError> {
    match state.backend.get_produto(current.token(), id).await {
        Ok(produto) => Ok(produto),
        Err(BackendError::NotFound(_)) => Err(AppError::not_found(MSG_PRODUTO_NAO_ENCONTRADO)),
        Err(e) => Err(AppError::backend(e, "visualizar produtos")),
    }
}

/// GET /listarProdutos?busca= - active and inactive products
pub async fn lista_produtos(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Query(query): Query<SearchQuery>,
) -> PageResult {
    let produtos = state
        .backend
        .list_produtos(current.token())
        .await
        .map_err(|e| AppError::backend(e, "visualizar produtos"))?;

    render(&ProdutosListaPage {
        ctx: page_context(&state, &current, "Produtos").await,
        busca: query.term().to_string(),
        produtos: produtos
            .iter()
            .filter(|p| p.matches(query.term()))
            .map(ProdutoView::from)
            .collect(),
        can_delete: current.role().is_admin(),
    })
}

/// GET /detalhesProduto/:id
pub async fn detalhes_produto(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> PageResult {
    let produto = load_produto(&state, &current, id).await?;
    render(&ProdutoDetalhesPage {
        ctx: page_context(&state, &current, &produto.nome).await,
        produto: ProdutoView::from(&produto),
        can_delete: current.role().is_admin(),
    })
}

struct FormTarget {
    heading: &'static str,
    action: String,
    back_url: String,
}

async fn form_page(
    state: &AppState,
    current: &CurrentSession,
    target: FormTarget,
    form: ProdutoForm,
    flash: Option<Flash>,
) -> PageResult {
    render(&ProdutoFormPage {
        ctx: page_context(state, current, target.heading).await.with_flash(flash),
        heading: target.heading.to_string(),
        action: target.action,
        back_url: target.back_url,
        min_date: min_expiry_date(today()),
        form,
    })
}

fn create_target() -> FormTarget {
    FormTarget {
        heading: "Cadastrar produto",
        action: "/cadastrarProduto".to_string(),
        back_url: "/listarProdutos".to_string(),
    }
}

fn edit_target(id: i64) -> FormTarget {
    FormTarget {
        heading: "Editar produto",
        action: format!("/editarProduto/{}", id),
        back_url: format!("/detalhesProduto/{}", id),
    }
}

/// GET /cadastrarProduto
pub async fn cadastrar_produto_page(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> PageResult {
    form_page(&state, &current, create_target(), ProdutoForm::default(), None).await
}

/// POST /cadastrarProduto
pub async fn cadastrar_produto(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Form(form): Form<ProdutoForm>,
) -> PageResult {
    let request = match validate_produto(&form, today()) {
        Ok(request) => request,
        Err(e) => return form_page(&state, &current, create_target(), form, Some(Flash::error(e.0))).await,
    };

    match state.backend.create_produto(current.token(), &request).await {
        Ok(produto) => {
            tracing::info!("Product {} created by {}", produto.id_produto, current.email());
            let flash = Flash::success("SUCESSO: Produto cadastrado com sucesso!");
            Ok(flash_redirect(&state, &current, flash, "/listarProdutos").await)
        }
        Err(e) if e.is_unauthorized() => Err(AppError::backend(e, "cadastrar produtos")),
        Err(e) => {
            let flash = Flash::error(e.user_message("cadastrar produtos"));
            form_page(&state, &current, create_target(), form, Some(flash)).await
        }
    }
}

/// GET /editarProduto/:id
pub async fn editar_produto_page(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> PageResult {
    let produto = load_produto(&state, &current, id).await?;
    form_page(&state, &current, edit_target(id), ProdutoForm::from_produto(&produto), None).await
}

/// POST /editarProduto/:id
pub async fn editar_produto(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
    Form(form): Form<ProdutoForm>,
) -> PageResult {
    let request = match validate_produto(&form, today()) {
        Ok(request) => request,
        Err(e) => return form_page(&state, &current, edit_target(id), form, Some(Flash::error(e.0))).await,
    };

    match state.backend.update_produto(current.token(), id, &request).await {
        Ok(_) => {
            tracing::info!("Product {} updated by {}", id, current.email());
            let flash = Flash::success("SUCESSO: Produto atualizado com sucesso!");
            Ok(flash_redirect(&state, &current, flash, &format!("/detalhesProduto/{}", id)).await)
        }
        Err(e) if e.is_unauthorized() => Err(AppError::backend(e, "editar produtos")),
        Err(e) => {
            let flash = Flash::error(e.user_message("editar produtos"));
            form_page(&state, &current, edit_target(id), form, Some(flash)).await
        }
    }
}

/// POST /excluirProduto/:id - administrators only
pub async fn excluir_produto(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> PageResult {
    match state.backend.delete_produto(current.token(), id).await {
        Ok(_) => {
            tracing::info!("Product {} deleted by {}", id, current.email());
            let flash = Flash::success("SUCESSO: Produto excluído com sucesso!");
            Ok(flash_redirect(&state, &current, flash, "/listarProdutos").await)
        }
        Err(e) => action_failed(&state, &current, e, "excluir produtos", "/listarProdutos").await,
    }
}
