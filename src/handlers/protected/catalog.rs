// handlers/protected/catalog.rs - client home and product catalog

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    Extension, Form,
};
use serde::Deserialize;

use crate::handlers::{action_failed, flash_redirect, load_failed, page_context, PageResult, SearchQuery};
use crate::session::CurrentSession;
use crate::state::AppState;
use crate::types::Flash;
use crate::views::{render, HomeClientePage, ProdutoClientePage, ProdutoView, ProdutosClientePage};

/// Products shown on the client home page
const DESTAQUES: usize = 6;

/// GET /homeCliente
pub async fn home_cliente(State(state): State<AppState>, Extension(current): Extension<CurrentSession>) -> PageResult {
    let produtos = state
        .backend
        .list_produtos(current.token())
        .await
        .map_err(load_failed("visualizar produtos"))?;

    let destaques = produtos
        .iter()
        .filter(|p| p.is_active())
        .take(DESTAQUES)
        .map(ProdutoView::from)
        .collect();

    render(&HomeClientePage {
        ctx: page_context(&state, &current, "Início").await,
        nome: current.session.display_name().to_string(),
        destaques,
    })
}

/// GET /produtosCliente?busca= - active products only
pub async fn produtos_cliente(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Query(query): Query<SearchQuery>,
) -> PageResult {
    let produtos = state
        .backend
        .list_produtos(current.token())
        .await
        .map_err(load_failed("visualizar produtos"))?;

    let produtos = produtos
        .iter()
        .filter(|p| p.is_active() && p.matches(query.term()))
        .map(ProdutoView::from)
        .collect();

    render(&ProdutosClientePage {
        ctx: page_context(&state, &current, "Produtos").await,
        busca: query.term().to_string(),
        produtos,
    })
}

/// GET /detalhesProdutoCliente/:id
pub async fn produto_cliente(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> PageResult {
    let produto = state
        .backend
        .get_produto(current.token(), id)
        .await
        .map_err(load_failed("visualizar produtos"))?;

    let no_carrinho = current.session.cart.get(id).map(|i| i.quantidade).unwrap_or(0);

    render(&ProdutoClientePage {
        ctx: page_context(&state, &current, &produto.nome).await,
        produto: ProdutoView::from(&produto),
        no_carrinho,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub quantidade: String,
}

/// POST /detalhesProdutoCliente/:id - add the product to the cart
pub async fn adicionar_ao_carrinho(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
    Form(form): Form<AddToCartForm>,
) -> PageResult {
    let back = format!("/detalhesProdutoCliente/{}", id);

    // Price and availability come from the API, never from the form
    let produto = match state.backend.get_produto(current.token(), id).await {
        Ok(produto) => produto,
        Err(e) => return action_failed(&state, &current, e, "visualizar produtos", &back).await,
    };

    let quantidade = super::cart::parse_quantidade(&form.quantidade);
    let added = state
        .sessions
        .update(&current.id, |s| s.cart.add(&produto, quantidade))
        .await;

    let response = match added {
        Some(Ok(())) => {
            tracing::debug!("Added {} x product {} to the cart of {}", quantidade, id, current.email());
            flash_redirect(&state, &current, Flash::success("Produto adicionado ao carrinho!"), "/carrinho").await
        }
        Some(Err(e)) => {
            let message = format!("Erro ao adicionar ao carrinho: {}", e);
            flash_redirect(&state, &current, Flash::error(message), &back).await
        }
        None => Redirect::to("/").into_response(),
    };
    Ok(response)
}
